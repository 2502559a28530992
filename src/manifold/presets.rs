//! Named valve/pump target configurations, one per manifold state.
//!
//! Several modes share a preset: the pump-on and pump-off twins of a paired
//! mode drive the valves identically and differ only in the relay. The table
//! is an owned value so a controller (and each test) has its own copy.

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::valve_map::VALVE_COUNT;
use crate::drivers::drv8823::codec::{ChannelField, MAX_CURRENT};
use crate::error::{Error, Result};

/// Target state of one valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveTarget {
    /// `true` opens the A-C path, `false` the B-C path.
    pub direction: bool,
    pub current: u8,
    pub decay: bool,
}

impl ValveTarget {
    /// Channel field that energises (or releases) this valve.
    pub const fn field(&self, enable: bool) -> Result<ChannelField> {
        ChannelField::new(self.decay, self.current, self.direction, enable)
    }
}

/// A full manifold configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub valves: [ValveTarget; VALVE_COUNT],
    pub pump: bool,
}

impl Preset {
    /// Build from a direction pattern, `1` meaning A-C.
    pub const fn from_pattern(dirs: [u8; VALVE_COUNT], pump: bool, current: u8, decay: bool) -> Self {
        let mut valves = [ValveTarget {
            direction: false,
            current,
            decay,
        }; VALVE_COUNT];
        let mut i = 0;
        while i < VALVE_COUNT {
            valves[i].direction = dirs[i] != 0;
            i += 1;
        }
        Self { valves, pump }
    }
}

/// Distinct preset slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetId {
    ZeroPump,
    ZeroVent,
    ZeroCal,
    SpanPump,
    SpanVent,
    SpanCal,
    EquilPump,
    EquilVent,
    EquilPost,
    AirPump,
    AirVent,
    AirPost,
    Rest,
    Deploy,
    Pressurize,
    Purge1,
    Purge2,
    Purge3,
    Purge4,
    Purge5,
    Purge6,
    Purge7,
    Purge8,
}

impl PresetId {
    pub const COUNT: usize = 23;

    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::ZeroPumpOn | Mode::ZeroPumpOff => Self::ZeroPump,
            Mode::ZeroVent => Self::ZeroVent,
            Mode::ZeroCal => Self::ZeroCal,
            Mode::SpanPumpOn | Mode::SpanPumpOff => Self::SpanPump,
            Mode::SpanVent => Self::SpanVent,
            Mode::SpanCal => Self::SpanCal,
            Mode::EquilPumpOn | Mode::EquilPumpOff => Self::EquilPump,
            Mode::EquilVent => Self::EquilVent,
            Mode::EquilPost => Self::EquilPost,
            Mode::AirPumpOn | Mode::AirPumpOff => Self::AirPump,
            Mode::AirVent => Self::AirVent,
            Mode::AirPost => Self::AirPost,
            Mode::Rest => Self::Rest,
            Mode::Deploy => Self::Deploy,
            Mode::Pressurize => Self::Pressurize,
            Mode::Purge1 => Self::Purge1,
            Mode::Purge2 => Self::Purge2,
            Mode::Purge3 => Self::Purge3,
            Mode::Purge4 => Self::Purge4,
            Mode::Purge5 => Self::Purge5,
            Mode::Purge6 => Self::Purge6,
            Mode::Purge7 => Self::Purge7,
            Mode::Purge8 => Self::Purge8,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Valve directions per preset, V1..V8. V7/V8 are spares and stay on B-C.
const PATTERNS: [([u8; VALVE_COUNT], bool); PresetId::COUNT] = [
    ([1, 0, 0, 1, 0, 0, 0, 0], true),  // ZeroPump
    ([1, 0, 0, 0, 1, 0, 0, 0], false), // ZeroVent
    ([1, 0, 0, 1, 0, 1, 0, 0], false), // ZeroCal
    ([0, 1, 0, 1, 0, 0, 0, 0], true),  // SpanPump
    ([0, 1, 0, 0, 1, 0, 0, 0], false), // SpanVent
    ([0, 1, 0, 1, 0, 1, 0, 0], false), // SpanCal
    ([0, 0, 1, 1, 0, 0, 0, 0], true),  // EquilPump
    ([0, 0, 1, 0, 1, 0, 0, 0], false), // EquilVent
    ([0, 0, 0, 0, 1, 1, 0, 0], false), // EquilPost
    ([0, 0, 0, 1, 0, 0, 0, 0], true),  // AirPump
    ([0, 0, 0, 0, 1, 0, 0, 0], false), // AirVent
    ([0, 0, 0, 0, 0, 1, 0, 0], false), // AirPost
    ([0, 0, 0, 0, 0, 0, 0, 0], false), // Rest
    ([0, 0, 1, 0, 0, 0, 0, 0], false), // Deploy
    ([1, 1, 0, 0, 0, 0, 0, 0], false), // Pressurize
    ([1, 0, 0, 0, 1, 1, 0, 0], true),  // Purge1
    ([0, 1, 0, 0, 1, 1, 0, 0], false), // Purge2
    ([1, 1, 0, 0, 1, 1, 0, 0], false), // Purge3
    ([0, 0, 1, 0, 1, 1, 0, 0], false), // Purge4
    ([1, 0, 1, 0, 1, 1, 0, 0], false), // Purge5
    ([0, 1, 1, 0, 1, 1, 0, 0], false), // Purge6
    ([1, 1, 1, 0, 1, 1, 0, 0], false), // Purge7
    ([0, 0, 0, 1, 1, 1, 0, 0], false), // Purge8
];

/// Runtime preset table.
///
/// All presets share one drive current; `set_global_current` rewrites it
/// everywhere at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetTable {
    presets: [Preset; PresetId::COUNT],
    current: u8,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::seeded(4, true)
    }
}

impl PresetTable {
    /// Factory table at the given current and decay. `current` is clamped
    /// to the 3-bit range.
    pub fn seeded(current: u8, decay: bool) -> Self {
        let current = current.min(MAX_CURRENT);
        let mut presets = [Preset::from_pattern([0; VALVE_COUNT], false, current, decay); PresetId::COUNT];
        for (slot, (dirs, pump)) in presets.iter_mut().zip(PATTERNS) {
            *slot = Preset::from_pattern(dirs, pump, current, decay);
        }
        Self { presets, current }
    }

    pub fn get(&self, id: PresetId) -> &Preset {
        &self.presets[id.index()]
    }

    /// Preset that `mode` drives.
    pub fn for_mode(&self, mode: Mode) -> &Preset {
        self.get(PresetId::for_mode(mode))
    }

    /// Set the drive current of every valve in every preset.
    ///
    /// Out-of-range levels are rejected and nothing changes.
    pub fn set_global_current(&mut self, level: u8) -> Result<()> {
        if level > MAX_CURRENT {
            return Err(Error::InvalidParameter("current level above 7"));
        }
        for preset in &mut self.presets {
            for valve in &mut preset.valves {
                valve.current = level;
            }
        }
        self.current = level;
        Ok(())
    }

    pub fn get_current(&self) -> u8 {
        self.current
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }
}
