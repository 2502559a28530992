//! Sample-pump relay driver.
//!
//! A single GPIO, high = pump running. This driver is a dumb actuator;
//! the motion controller decides when the pump runs.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Off,
    On,
}

pub struct Relay<P> {
    pin: P,
    state: RelayState,
}

impl<P: OutputPin> Relay<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: RelayState::Off,
        }
    }

    /// Drive the line low regardless of the recorded state.
    pub fn init(&mut self) -> Result<()> {
        self.pin.set_low().map_err(|_| Error::Gpio("relay"))?;
        self.state = RelayState::Off;
        Ok(())
    }

    pub fn on(&mut self) -> Result<()> {
        self.pin.set_high().map_err(|_| Error::Gpio("relay"))?;
        self.state = RelayState::On;
        Ok(())
    }

    pub fn off(&mut self) -> Result<()> {
        self.pin.set_low().map_err(|_| Error::Gpio("relay"))?;
        self.state = RelayState::Off;
        Ok(())
    }

    pub fn set(&mut self, on: bool) -> Result<()> {
        if on { self.on() } else { self.off() }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        matches!(self.state, RelayState::On)
    }
}
