//! Operational modes of the pCO2 gas-flow manifold.
//!
//! Each mode has a 16-bit code used on the console and in logs. For the
//! paired measurement modes (Zero, Span, Equil, Air) bit 0 of the code is
//! the pump flag: the `PumpOn`/`PumpOff` twins differ only in that bit.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Mode {
    ZeroPumpOn = 0x0003,
    ZeroPumpOff = 0x0002,
    ZeroVent = 0x0004,
    ZeroCal = 0x0008,
    SpanPumpOn = 0x0013,
    SpanPumpOff = 0x0012,
    SpanVent = 0x0014,
    SpanCal = 0x0018,
    EquilPumpOn = 0x0023,
    EquilPumpOff = 0x0022,
    EquilVent = 0x0024,
    EquilPost = 0x0028,
    AirPumpOn = 0x0043,
    AirPumpOff = 0x0042,
    AirVent = 0x0044,
    AirPost = 0x0048,
    Rest = 0x0082,
    Deploy = 0x0084,
    Pressurize = 0x0100,
    Purge1 = 0x0111,
    Purge2 = 0x0120,
    Purge3 = 0x0130,
    Purge4 = 0x0140,
    Purge5 = 0x0150,
    Purge6 = 0x0160,
    Purge7 = 0x0170,
    Purge8 = 0x0180,
}

impl Mode {
    pub const COUNT: usize = 27;

    pub const ALL: [Self; Self::COUNT] = [
        Self::ZeroPumpOn,
        Self::ZeroPumpOff,
        Self::ZeroVent,
        Self::ZeroCal,
        Self::SpanPumpOn,
        Self::SpanPumpOff,
        Self::SpanVent,
        Self::SpanCal,
        Self::EquilPumpOn,
        Self::EquilPumpOff,
        Self::EquilVent,
        Self::EquilPost,
        Self::AirPumpOn,
        Self::AirPumpOff,
        Self::AirVent,
        Self::AirPost,
        Self::Rest,
        Self::Deploy,
        Self::Pressurize,
        Self::Purge1,
        Self::Purge2,
        Self::Purge3,
        Self::Purge4,
        Self::Purge5,
        Self::Purge6,
        Self::Purge7,
        Self::Purge8,
    ];

    /// Raw mode code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.code() == code)
    }

    /// Whether this mode has a pump-on/pump-off twin.
    pub const fn is_paired(self) -> bool {
        matches!(
            self,
            Self::ZeroPumpOn
                | Self::ZeroPumpOff
                | Self::SpanPumpOn
                | Self::SpanPumpOff
                | Self::EquilPumpOn
                | Self::EquilPumpOff
                | Self::AirPumpOn
                | Self::AirPumpOff
        )
    }

    /// Pump state carried in the code, for paired modes only.
    pub const fn pump_bit(self) -> Option<bool> {
        if self.is_paired() {
            Some(self.code() & 0x0001 != 0)
        } else {
            None
        }
    }

    /// The twin with the opposite pump bit. `None` for unpaired modes.
    pub fn pump_partner(self) -> Option<Self> {
        if self.is_paired() {
            Self::from_code(self.code() ^ 0x0001)
        } else {
            None
        }
    }

    /// Console name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZeroPumpOn => "ZERO_ON",
            Self::ZeroPumpOff => "ZERO_OFF",
            Self::ZeroVent => "ZERO_VENT",
            Self::ZeroCal => "ZERO_POST",
            Self::SpanPumpOn => "SPAN_ON",
            Self::SpanPumpOff => "SPAN_OFF",
            Self::SpanVent => "SPAN_VENT",
            Self::SpanCal => "SPAN_POST",
            Self::EquilPumpOn => "EQUIL_ON",
            Self::EquilPumpOff => "EQUIL_OFF",
            Self::EquilVent => "EQUIL_VENT",
            Self::EquilPost => "EQUIL_POST",
            Self::AirPumpOn => "AIR_ON",
            Self::AirPumpOff => "AIR_OFF",
            Self::AirVent => "AIR_VENT",
            Self::AirPost => "AIR_POST",
            Self::Rest => "REST",
            Self::Deploy => "DEPLOY",
            Self::Pressurize => "PRESSURIZE",
            Self::Purge1 => "PRG1",
            Self::Purge2 => "PRG2",
            Self::Purge3 => "PRG3",
            Self::Purge4 => "PRG4",
            Self::Purge5 => "PRG5",
            Self::Purge6 => "PRG6",
            Self::Purge7 => "PRG7",
            Self::Purge8 => "PRG8",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or(Error::InvalidParameter("unknown mode name"))
    }
}
