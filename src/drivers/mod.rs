//! Actuator drivers: the DRV8823 valve bridges and the pump relay.

pub mod drv8823;
pub mod relay;
