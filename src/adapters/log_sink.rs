//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured motion events to the
//! `log` facade (UART console in production). A telemetry adapter would
//! implement the same trait.

use log::{error, info, warn};

use crate::app::events::MotionEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`MotionEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MotionEvent) {
        match event {
            MotionEvent::Initialized {
                pulse_width_ms,
                current,
            } => {
                info!("INIT | mode=REST | pulse={}ms | current={}", pulse_width_ms, current);
            }
            MotionEvent::ModeChanged { from, to } => {
                info!("MODE | {} (0x{:04X}) -> {} (0x{:04X})", from, from.code(), to, to.code());
            }
            MotionEvent::ActuationFailed { requested, error } => match requested {
                Some(mode) => warn!("FAIL | {} | {}", mode, error),
                None => warn!("FAIL | {}", error),
            },
            MotionEvent::DesyncHazard { mode, error } => {
                error!("DESYNC | reported={} | {} | valves may not match", mode, error);
            }
            MotionEvent::PumpToggled { on, mode } => {
                info!("PUMP | {} | mode={}", if *on { "ON" } else { "OFF" }, mode);
            }
            MotionEvent::CurrentChanged(level) => {
                info!("CURRENT | {}", level);
            }
            MotionEvent::PulseWidthChanged(ms) => {
                info!("PULSE | {}ms", ms);
            }
            MotionEvent::ValveOverridden { valve, direction } => {
                info!("VALVE | V{} -> {}", valve + 1, if *direction { "A" } else { "B" });
            }
            MotionEvent::PanicCompleted { failures } => {
                if *failures == 0 {
                    info!("PANIC | complete");
                } else {
                    warn!("PANIC | complete, {} failed steps", failures);
                }
            }
            MotionEvent::DriversAsleep => {
                info!("SLEEP | drivers asleep");
            }
        }
    }
}
