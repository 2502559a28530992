//! Manifold wiring: which driver chip and channel actuates each valve.
//!
//! Single source of truth for the valve harness. Valve index `n` is the
//! silk-screen label `V(n+1)` on the manifold board. Fixed at compile time.

use core::fmt;

use crate::drivers::drv8823::codec::ChannelId;

/// Number of latching valves on the manifold.
pub const VALVE_COUNT: usize = 8;

/// One of the two daisy-chained DRV8823 chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipId {
    A,
    B,
}

impl ChipId {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Where one valve's solenoid is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveEntry {
    pub chip: ChipId,
    pub channel: ChannelId,
}

impl ValveEntry {
    const fn new(chip: ChipId, channel: ChannelId) -> Self {
        Self { chip, channel }
    }
}

/// V1–V4 on driver A, V5–V8 on driver B, channels in order.
pub const VALVE_MAP: [ValveEntry; VALVE_COUNT] = [
    ValveEntry::new(ChipId::A, ChannelId::A),
    ValveEntry::new(ChipId::A, ChannelId::B),
    ValveEntry::new(ChipId::A, ChannelId::C),
    ValveEntry::new(ChipId::A, ChannelId::D),
    ValveEntry::new(ChipId::B, ChannelId::A),
    ValveEntry::new(ChipId::B, ChannelId::B),
    ValveEntry::new(ChipId::B, ChannelId::C),
    ValveEntry::new(ChipId::B, ChannelId::D),
];

/// Look up a valve's wiring. `None` for an index past the last valve.
pub fn route(valve: usize) -> Option<ValveEntry> {
    VALVE_MAP.get(valve).copied()
}
