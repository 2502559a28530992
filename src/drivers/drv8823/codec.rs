//! DRV8823 channel codec.
//!
//! Each H-bridge channel is commanded by a 6-bit sub-field. Two channels
//! share one 16-bit register word; bit 12 selects which word it is.
//!
//! ```text
//! AB word: | 15..13 = 000 | 12 = 0 | 11..6 = B field | 5..0 = A field |
//! CD word: | 15..13 = 000 | 12 = 1 | 11..6 = D field | 5..0 = C field |
//!
//! field:   | 5 = decay | 4..2 = current | 1 = phase | 0 = enable |
//! ```
//!
//! Pure functions only. The driver owns all sequencing.

use crate::error::{Error, Result};

/// Highest valid current level (3-bit field).
pub const MAX_CURRENT: u8 = 7;

const FIELD_BITS: u16 = 0x003F;
const HIGH_SHIFT: u32 = 6;
const CD_SELECT: u16 = 1 << 12;

/// One of the four H-bridge outputs on a DRV8823.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    A,
    B,
    C,
    D,
}

impl ChannelId {
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// Register word this channel lives in.
    pub const fn register(self) -> Register {
        match self {
            Self::A | Self::B => Register::Ab,
            Self::C | Self::D => Register::Cd,
        }
    }

    /// Bits this channel occupies inside its register word.
    pub const fn mask(self) -> u16 {
        match self {
            Self::A | Self::C => FIELD_BITS,
            Self::B | Self::D => FIELD_BITS << HIGH_SHIFT,
        }
    }

    const fn is_high_half(self) -> bool {
        matches!(self, Self::B | Self::D)
    }
}

/// The two register words of a DRV8823.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Ab,
    Cd,
}

/// Commanded state of one H-bridge output.
///
/// Only constructible through validating constructors, so a value in hand
/// always fits the hardware field widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelField {
    decay: bool,
    current: u8,
    phase: bool,
    enable: bool,
}

impl ChannelField {
    /// Build a field. Fails if `current` exceeds [`MAX_CURRENT`].
    pub const fn new(decay: bool, current: u8, phase: bool, enable: bool) -> Result<Self> {
        if current > MAX_CURRENT {
            return Err(Error::InvalidParameter("current level above 7"));
        }
        Ok(Self {
            decay,
            current,
            phase,
            enable,
        })
    }

    /// Build a field from raw 0/1 flags, as received from a console or a
    /// stored table. Any flag other than 0 or 1 is rejected.
    pub fn from_raw(decay: u8, current: u8, phase: u8, enable: u8) -> Result<Self> {
        if decay > 1 {
            return Err(Error::InvalidParameter("decay flag must be 0 or 1"));
        }
        if phase > 1 {
            return Err(Error::InvalidParameter("phase flag must be 0 or 1"));
        }
        if enable > 1 {
            return Err(Error::InvalidParameter("enable flag must be 0 or 1"));
        }
        Self::new(decay == 1, current, phase == 1, enable == 1)
    }

    /// Same field with the enable bit replaced.
    #[must_use]
    pub const fn with_enable(self, enable: bool) -> Self {
        Self { enable, ..self }
    }

    pub const fn decay(&self) -> bool {
        self.decay
    }

    pub const fn current(&self) -> u8 {
        self.current
    }

    pub const fn phase(&self) -> bool {
        self.phase
    }

    pub const fn enable(&self) -> bool {
        self.enable
    }

    const fn bits(self) -> u16 {
        (self.enable as u16)
            | ((self.phase as u16) << 1)
            | ((self.current as u16) << 2)
            | ((self.decay as u16) << 5)
    }
}

/// Encode `field` into its position within `channel`'s register word.
///
/// The result is a partial word: OR the two channels of a register together
/// to get the full word. Bits 13..15 are always zero.
pub const fn encode(channel: ChannelId, field: ChannelField) -> u16 {
    let mut word = field.bits();
    if channel.is_high_half() {
        word <<= HIGH_SHIFT;
    }
    if matches!(channel.register(), Register::Cd) {
        word |= CD_SELECT;
    }
    word
}

/// Extract `channel`'s field back out of a register word.
pub const fn decode(channel: ChannelId, word: u16) -> ChannelField {
    let mut bits = word;
    if channel.is_high_half() {
        bits >>= HIGH_SHIFT;
    }
    ChannelField {
        enable: bits & 0x01 != 0,
        phase: bits & 0x02 != 0,
        current: ((bits >> 2) & 0x07) as u8,
        decay: bits & 0x20 != 0,
    }
}

/// Four channel fields plus the two register words derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcCommandSet {
    pub fields: [ChannelField; 4],
    pub word_ab: u16,
    pub word_cd: u16,
}

impl Default for IcCommandSet {
    /// All channels disabled. Matches the chip's state after reset.
    fn default() -> Self {
        Self::from_fields([ChannelField::default(); 4])
    }
}

impl IcCommandSet {
    /// Encode all four channels fresh.
    pub const fn from_fields(fields: [ChannelField; 4]) -> Self {
        Self {
            fields,
            word_ab: encode(ChannelId::A, fields[0]) | encode(ChannelId::B, fields[1]),
            word_cd: encode(ChannelId::C, fields[2]) | encode(ChannelId::D, fields[3]),
        }
    }

    pub const fn field(&self, channel: ChannelId) -> ChannelField {
        self.fields[channel.index()]
    }

    pub const fn word(&self, register: Register) -> u16 {
        match register {
            Register::Ab => self.word_ab,
            Register::Cd => self.word_cd,
        }
    }

    /// Replace one channel, keeping the other three channels' bits as they
    /// are in the existing words.
    pub fn merge(&mut self, channel: ChannelId, field: ChannelField) {
        self.fields[channel.index()] = field;
        let bits = encode(channel, field);
        match channel.register() {
            Register::Ab => self.word_ab = (self.word_ab & !channel.mask()) | bits,
            // Keep the CD select bit set even when the stored word was blank.
            Register::Cd => self.word_cd = (self.word_cd & !channel.mask()) | bits | CD_SELECT,
        }
    }
}
