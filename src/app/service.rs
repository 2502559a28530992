//! Motion service — the hexagonal core.
//!
//! [`MotionService`] wraps the [`MotionControl`] orchestrator with a typed
//! command surface. Every command's outcome leaves as a [`MotionEvent`]
//! through the [`EventSink`] port, so a console, a scheduler or a test can
//! drive the manifold without knowing the hardware.
//!
//! ```text
//!  MotionCommand ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                    │      MotionService       │
//!                    │  MotionControl (A, B, R) │
//!                    └──────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::info;

use super::commands::MotionCommand;
use super::events::MotionEvent;
use super::ports::{BridgeDriver, EventSink};
use crate::error::{Error, Result};
use crate::manifold::mode::Mode;
use crate::motion::{ControllerState, MotionControl};

// ───────────────────────────────────────────────────────────────
// MotionService
// ───────────────────────────────────────────────────────────────

pub struct MotionService<A, B, R, D> {
    control: MotionControl<A, B, R, D>,
    commands_handled: u32,
}

impl<A, B, R, D> MotionService<A, B, R, D>
where
    A: BridgeDriver,
    B: BridgeDriver,
    R: OutputPin,
    D: DelayNs,
{
    pub fn new(control: MotionControl<A, B, R, D>) -> Self {
        Self {
            control,
            commands_handled: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.control.init()?;
        sink.emit(&MotionEvent::Initialized {
            pulse_width_ms: self.control.get_pulse_width_ms(),
            current: self.control.get_current(),
        });
        info!("MotionService started in {}", self.control.get_mode());
        Ok(())
    }

    // ── Command handling ──────────────────────────────────────

    /// Execute one command and report its outcome through `sink`.
    ///
    /// The error is also returned so a console can reply inline.
    pub fn handle_command(&mut self, cmd: MotionCommand, sink: &mut impl EventSink) -> Result<()> {
        self.commands_handled = self.commands_handled.wrapping_add(1);
        let requested = match cmd {
            MotionCommand::SetMode(mode) => Some(mode),
            _ => None,
        };

        let result = self.dispatch(cmd, sink);
        if let Err(error) = result {
            sink.emit(&MotionEvent::ActuationFailed { requested, error });
            if error.is_hardware_desync() {
                sink.emit(&MotionEvent::DesyncHazard {
                    mode: self.control.get_mode(),
                    error,
                });
            }
        }
        result
    }

    fn dispatch(&mut self, cmd: MotionCommand, sink: &mut impl EventSink) -> Result<()> {
        match cmd {
            MotionCommand::SetMode(to) => {
                let from = self.control.get_mode();
                self.control.set_mode(to)?;
                sink.emit(&MotionEvent::ModeChanged { from, to });
            }
            MotionCommand::TogglePump => {
                let on = self.control.toggle_pump()?;
                sink.emit(&MotionEvent::PumpToggled {
                    on,
                    mode: self.control.get_mode(),
                });
            }
            MotionCommand::SetCurrent(level) => {
                self.control.set_current(level)?;
                sink.emit(&MotionEvent::CurrentChanged(level));
            }
            MotionCommand::SetPulseWidth(ms) => {
                self.control.set_pulse_width_ms(ms)?;
                sink.emit(&MotionEvent::PulseWidthChanged(ms));
            }
            MotionCommand::SetValve { valve, direction } => {
                self.control.set_valve(valve, direction)?;
                sink.emit(&MotionEvent::ValveOverridden { valve, direction });
            }
            MotionCommand::Panic => {
                let failures = self.control.panic_recover()?;
                sink.emit(&MotionEvent::PanicCompleted { failures });
            }
            MotionCommand::Sleep => {
                self.control.sleep_drivers()?;
                sink.emit(&MotionEvent::DriversAsleep);
            }
        }
        Ok(())
    }

    /// Parse a console mode name (e.g. `ZERO_ON`) and switch to it.
    pub fn set_mode_by_name(&mut self, name: &str, sink: &mut impl EventSink) -> Result<()> {
        let mode: Mode = name.parse()?;
        self.handle_command(MotionCommand::SetMode(mode), sink)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        self.control.state()
    }

    /// Last error if the controller is in `Fault`.
    pub fn last_error(&self) -> Option<Error> {
        match self.control.state() {
            ControllerState::Fault { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn commands_handled(&self) -> u32 {
        self.commands_handled
    }

    pub fn control(&self) -> &MotionControl<A, B, R, D> {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut MotionControl<A, B, R, D> {
        &mut self.control
    }
}
