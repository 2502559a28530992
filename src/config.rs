//! Motion-control configuration parameters
//!
//! Timing and drive settings for the valve manifold. Defaults match the
//! LEE latching valves fitted to the pCO2 flow controller.

use serde::{Deserialize, Serialize};

use crate::drivers::drv8823::codec::MAX_CURRENT;
use crate::error::{Error, Result};

/// GPIO sequencing delays handed to each DRV8823 driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverTiming {
    /// Width of the latch strobe pulse (ms)
    pub strobe_delay_ms: u32,
    /// nRESET hold time (ms)
    pub reset_delay_ms: u32,
    /// Settle time after releasing nSLEEP (ms)
    pub wakeup_delay_ms: u32,
}

impl Default for DriverTiming {
    fn default() -> Self {
        Self {
            strobe_delay_ms: 1,
            reset_delay_ms: 1,
            wakeup_delay_ms: 2,
        }
    }
}

/// Motion-control configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionConfig {
    // --- Driver sequencing ---
    pub timing: DriverTiming,

    // --- Valve pulse ---
    /// Initial energise time per actuation (ms)
    pub pulse_width_ms: u32,
    /// Lower bound accepted by `set_pulse_width_ms` (ms)
    pub min_pulse_width_ms: u32,

    // --- Drive ---
    /// Seeded drive current level (0-7, 7 = 100%)
    pub nominal_current: u8,
    /// Seeded decay bit (true = fast decay)
    pub fast_decay: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            timing: DriverTiming::default(),

            // LEE valves latch reliably between 10 and 100 ms
            pulse_width_ms: 50,
            min_pulse_width_ms: 10,

            nominal_current: 4, // 83% drive
            fast_decay: true,
        }
    }
}

impl MotionConfig {
    /// Range-check every field. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if self.nominal_current > MAX_CURRENT {
            return Err(Error::InvalidParameter("nominal_current above 7"));
        }
        if self.min_pulse_width_ms == 0 {
            return Err(Error::InvalidParameter("min_pulse_width_ms must be non-zero"));
        }
        if self.pulse_width_ms < self.min_pulse_width_ms {
            return Err(Error::InvalidParameter("pulse_width_ms below minimum"));
        }
        Ok(())
    }
}
