//! Inbound commands to the motion service.
//!
//! These represent actions requested by the outside world (serial console,
//! the sampling scheduler) that the
//! [`MotionService`](super::service::MotionService) interprets and acts upon.

use crate::manifold::mode::Mode;

/// Commands that external adapters can send into the motion core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    /// Drive the manifold to a mode.
    SetMode(Mode),

    /// Flip the sample pump without moving valves.
    TogglePump,

    /// Drive current level for every preset (0-7).
    SetCurrent(u8),

    /// Valve energise time in milliseconds.
    SetPulseWidth(u32),

    /// Move a single valve (index 0-7, `true` = A-C). Diagnostic only.
    SetValve { valve: usize, direction: bool },

    /// Run the stuck-valve recovery sweep.
    Panic,

    /// Put both bridge drivers to sleep.
    Sleep,
}
