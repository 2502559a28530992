//! Fuzz target: DRV8823 channel codec
//!
//! Feeds arbitrary raw flag bytes through `ChannelField::from_raw` and, for
//! accepted fields, through `encode`/`decode` and `IcCommandSet::merge`.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - `from_raw` accepts exactly flags in 0..=1 and current in 0..=7
//! - Encoded words never set bits 13..15
//! - `decode(encode(f)) == f`
//! - `merge` only changes the target channel's bits
//!
//! cargo fuzz run fuzz_channel_codec

#![no_main]

use flowcontrol::drivers::drv8823::codec::{ChannelField, ChannelId, IcCommandSet, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let (d, c, p, e) = (data[0], data[1], data[2], data[3]);
    let channel = ChannelId::ALL[(data[4] & 0x03) as usize];

    let accepted = d <= 1 && c <= 7 && p <= 1 && e <= 1;
    let field = match ChannelField::from_raw(d, c, p, e) {
        Ok(f) => {
            assert!(accepted, "accepted out-of-range input {d} {c} {p} {e}");
            f
        }
        Err(_) => {
            assert!(!accepted, "rejected valid input {d} {c} {p} {e}");
            return;
        }
    };

    let word = encode(channel, field);
    assert_eq!(word & 0xE000, 0);
    assert_eq!(decode(channel, word), field);

    // Remaining bytes seed the neighbouring channels.
    let mut fields = [ChannelField::default(); 4];
    for (slot, b) in fields.iter_mut().zip(data[5..].iter()) {
        *slot = ChannelField::new(b & 0x20 != 0, (b >> 2) & 0x07, b & 0x02 != 0, b & 0x01 != 0)
            .unwrap();
    }
    let before = IcCommandSet::from_fields(fields);
    let mut after = before;
    after.merge(channel, field);
    let word_before = before.word(channel.register());
    let word_after = after.word(channel.register());
    assert_eq!(word_before & !channel.mask(), word_after & !channel.mask());
});
