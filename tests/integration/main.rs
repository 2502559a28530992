//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock hardware. All tests run on the host with no real
//! hardware required.

mod driver_tests;
mod service_tests;
