//! Port traits — the hexagonal boundary between motion logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MotionControl / MotionService
//! ```
//!
//! GPIO, SPI data transfer and delays come straight from `embedded-hal`.
//! The traits here cover what `embedded-hal` leaves to the board: bus
//! setup, the chip-level driver seam, and where structured events go.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Mode};

use super::events::MotionEvent;
use crate::drivers::drv8823::codec::{ChannelField, ChannelId};
use crate::error::Result;
use crate::manifold::valve_map::ChipId;

// ───────────────────────────────────────────────────────────────
// SPI bus control (driven adapter: driver → SPI peripheral)
// ───────────────────────────────────────────────────────────────

/// Peripheral-level control of the SPI block shared by both drivers.
///
/// `embedded_hal::spi::SpiBus` moves bytes; this trait switches the block
/// on and off and sets clock polarity and phase. Implemented by the same
/// type as the bus, sharing its error type.
pub trait BusControl: ErrorType {
    /// Set polarity and phase. Called once from driver init.
    fn configure(&mut self, mode: Mode) -> core::result::Result<(), Self::Error>;

    /// Take the peripheral out of reset.
    fn enable(&mut self) -> core::result::Result<(), Self::Error>;

    /// Hold the peripheral in reset.
    fn disable(&mut self) -> core::result::Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Bridge driver port (driven adapter: orchestrator → H-bridge chip)
// ───────────────────────────────────────────────────────────────

/// One quad H-bridge chip as the motion controller sees it.
///
/// [`Drv8823`](crate::drivers::drv8823::Drv8823) is the production
/// implementation. The delay provider is lent per call because both chips
/// share the one the controller owns.
pub trait BridgeDriver {
    fn chip(&self) -> ChipId;

    /// Configure the bus and bring the chip to an awake, operating state.
    fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<()>;

    /// Release sleep and wait for the chip to settle.
    fn wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<()>;

    /// Enter low-power sleep. GPIO only.
    fn sleep(&mut self) -> Result<()>;

    /// Full reset pulse; leaves the chip asleep.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<()>;

    /// Change one channel, keeping the other three as last latched.
    fn set_single_channel<D: DelayNs>(
        &mut self,
        channel: ChannelId,
        field: ChannelField,
        delay: &mut D,
    ) -> Result<()>;

    /// Command all four channels in two words (AB, then CD).
    fn set_all_channels<D: DelayNs>(&mut self, fields: [ChannelField; 4], delay: &mut D) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The motion service emits structured [`MotionEvent`]s through this port.
/// Adapters decide where they go (serial log, console reply, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &MotionEvent);
}
