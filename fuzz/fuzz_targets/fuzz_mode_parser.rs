//! Fuzz target: console mode names and raw mode codes
//!
//! Invariants checked:
//! - No panics on arbitrary UTF-8 or arbitrary 16-bit codes
//! - A parsed mode's canonical name parses back to the same mode
//! - `from_code` only returns modes whose code matches
//! - Paired modes' partners differ in bit 0 only
//!
//! cargo fuzz run fuzz_mode_parser

#![no_main]

use flowcontrol::manifold::Mode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() >= 2 {
        let code = u16::from_le_bytes([data[0], data[1]]);
        if let Some(m) = Mode::from_code(code) {
            assert_eq!(m.code(), code);
            if let Some(partner) = m.pump_partner() {
                assert_eq!(partner.code() ^ code, 0x0001);
            }
        }
    }

    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(m) = s.parse::<Mode>() {
            assert_eq!(m.name().parse::<Mode>(), Ok(m));
        }
    }
});
