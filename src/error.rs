//! Unified error type for the flow-controller motion stack.
//!
//! A single `Error` enum that the codec, the DRV8823 drivers and the
//! orchestrator all return, so command handlers see one type. All variants
//! are `Copy` so they can be stored in controller state and events without
//! allocation.

use core::fmt;

use crate::manifold::valve_map::ChipId;

/// Every fallible operation in the motion stack funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A field or setting was out of range. Raised before any hardware
    /// write, so nothing changed.
    InvalidParameter(&'static str),
    /// The SPI transfer to this chip failed. The word in flight was not
    /// strobed into the output stage.
    TransferFailed(ChipId),
    /// On this chip the AB word latched but the CD word did not. Channels
    /// A/B now run the new command while C/D still run the previous one.
    PartialCommit(ChipId),
    /// A GPIO line reported an error. Carries the line name.
    Gpio(&'static str),
    /// Actuation requested before `init()`.
    NotInitialized,
}

impl Error {
    /// Whether the physical outputs may no longer match any logical mode.
    ///
    /// Validation and init errors leave hardware untouched. A partial commit
    /// always leaves a mixed state. A failed transfer may too, when an
    /// earlier word of the same actuation already latched; callers that
    /// cannot tell should treat it as a desync and force a resync.
    pub const fn is_hardware_desync(self) -> bool {
        matches!(self, Self::PartialCommit(_) | Self::TransferFailed(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(what) => write!(f, "invalid parameter: {what}"),
            Self::TransferFailed(chip) => write!(f, "SPI transfer failed on driver {chip}"),
            Self::PartialCommit(chip) => {
                write!(f, "partial commit on driver {chip}: AB latched, CD did not")
            }
            Self::Gpio(line) => write!(f, "GPIO write failed on {line}"),
            Self::NotInitialized => write!(f, "motion control not initialised"),
        }
    }
}

impl core::error::Error for Error {}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
