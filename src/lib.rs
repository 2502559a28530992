//! pCO2 flow-controller motion library.
//!
//! Drives the eight latching valves and the sample pump of the gas-flow
//! manifold through two daisy-chained DRV8823 quad H-bridges. Hardware is
//! reached only through `embedded-hal` traits and the ports in
//! [`app::ports`], so everything here runs on the host under test.

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod manifold;
pub mod motion;

pub use config::{DriverTiming, MotionConfig};
pub use error::{Error, Result};
pub use manifold::Mode;
pub use motion::{ControllerState, MotionControl};
