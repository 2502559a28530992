//! Lifecycle state of the motion controller.

use crate::error::Error;
use crate::manifold::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// `init()` has not run yet. Actuation is refused.
    Uninitialized,
    /// Ready; the manifold is believed to be in this mode.
    Idle(Mode),
    /// A valve actuation is in progress.
    Actuating,
    /// The last actuation failed. `last_good` is still reported as the
    /// active mode, but the valves may not match it when
    /// `error.is_hardware_desync()`.
    Fault { last_good: Mode, error: Error },
}

impl ControllerState {
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}
