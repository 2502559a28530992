//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to       |
//! |------------|------------|-------------------|
//! | `log_sink` | EventSink  | Serial log output |
//!
//! `BridgeDriver` is implemented by [`crate::drivers::drv8823::Drv8823`].

pub mod log_sink;
