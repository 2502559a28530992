//! Gas-flow manifold domain: operational modes, valve wiring and the
//! target configuration each mode drives.

pub mod mode;
pub mod presets;
pub mod valve_map;

pub use mode::Mode;
pub use presets::{Preset, PresetId, PresetTable, ValveTarget};
pub use valve_map::{ChipId, VALVE_COUNT, VALVE_MAP, ValveEntry};
