//! Application core — command dispatch and event emission, zero I/O.
//!
//! The motion rules live in [`crate::motion`]; this layer gives them a
//! typed command surface. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
