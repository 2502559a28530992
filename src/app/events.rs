//! Outbound motion events.
//!
//! The [`MotionService`](super::service::MotionService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them.

use crate::error::Error;
use crate::manifold::mode::Mode;

/// Structured events emitted by the motion core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// Controller initialised; manifold assumed at Rest.
    Initialized { pulse_width_ms: u32, current: u8 },

    /// A mode change fully latched.
    ModeChanged { from: Mode, to: Mode },

    /// A command failed. The previous mode is still active.
    ActuationFailed { requested: Option<Mode>, error: Error },

    /// The valves may no longer match the reported mode.
    DesyncHazard { mode: Mode, error: Error },

    PumpToggled { on: bool, mode: Mode },

    CurrentChanged(u8),

    PulseWidthChanged(u32),

    /// A single valve was moved outside the preset table.
    ValveOverridden { valve: usize, direction: bool },

    /// Recovery sweep finished; `failures` chip commands did not latch.
    PanicCompleted { failures: u32 },

    DriversAsleep,
}
