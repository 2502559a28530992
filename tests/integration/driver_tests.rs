//! DRV8823 driver against recording mocks: pin sequencing, SPI framing and
//! commit bookkeeping.

use embedded_hal::spi::MODE_2;

use flowcontrol::app::ports::BridgeDriver;
use flowcontrol::config::MotionConfig;
use flowcontrol::drivers::drv8823::codec::{ChannelField, ChannelId, IcCommandSet};
use flowcontrol::drivers::drv8823::{Drv8823, Drv8823Pins};
use flowcontrol::error::Error;
use flowcontrol::manifold::ChipId;

use crate::mock_hw::{HwEvent, Journal, MockDelay, MockPin, MockSpi, driver};

fn pin(line: &str, high: bool) -> HwEvent {
    HwEvent::Pin {
        line: line.to_string(),
        high,
    }
}

fn field(phase: bool, enable: bool) -> ChannelField {
    ChannelField::new(true, 4, phase, enable).unwrap()
}

#[test]
fn init_configures_mode_2_and_releases_control_lines() {
    let journal = Journal::new();
    let (mut drv, _spi) = driver(ChipId::A, &journal);
    let mut delay = MockDelay::new(&journal);

    drv.init(&mut delay).unwrap();

    assert_eq!(
        journal.events(),
        vec![
            HwEvent::SpiMode {
                chip: ChipId::A,
                mode: MODE_2
            },
            pin("cs_a", false),
            pin("strobe", false),
            pin("nreset", true),
            pin("nsleep", true),
            HwEvent::SpiEnable {
                chip: ChipId::A,
                on: true
            },
        ]
    );
    assert_eq!(*drv.committed(), IcCommandSet::default());
}

#[test]
fn word_is_framed_msb_first_and_strobed() {
    let journal = Journal::new();
    let (mut drv, _spi) = driver(ChipId::B, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();
    journal.clear();

    let full = ChannelField::new(true, 7, true, true).unwrap();
    drv.set_single_channel(ChannelId::D, full, &mut delay).unwrap();

    assert_eq!(
        journal.events(),
        vec![
            pin("cs_b", true),
            HwEvent::SpiTx {
                chip: ChipId::B,
                bytes: vec![0x1F, 0xC0]
            },
            pin("strobe", true),
            HwEvent::DelayMs(1),
            pin("strobe", false),
            pin("cs_b", false),
        ]
    );
}

#[test]
fn set_all_channels_sends_ab_then_cd() {
    let journal = Journal::new();
    let (mut drv, _spi) = driver(ChipId::A, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();
    journal.clear();

    let fields = [field(true, true), field(false, true), field(true, false), field(false, false)];
    drv.set_all_channels(fields, &mut delay).unwrap();

    let expected = IcCommandSet::from_fields(fields);
    assert_eq!(journal.words(ChipId::A), vec![expected.word_ab, expected.word_cd]);
    assert_eq!(journal.count_pin("strobe", true), 2);
    assert_eq!(*drv.committed(), expected);
    assert_eq!(drv.pending(), drv.committed());
}

#[test]
fn ab_failure_latches_nothing() {
    let journal = Journal::new();
    let (mut drv, spi) = driver(ChipId::A, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();
    journal.clear();

    spi.fail_nth_write(0);
    let r = drv.set_all_channels([field(true, true); 4], &mut delay);

    assert_eq!(r, Err(Error::TransferFailed(ChipId::A)));
    assert_eq!(journal.count_pin("strobe", true), 0);
    assert_eq!(journal.level("cs_a"), Some(false));
    assert_eq!(*drv.committed(), IcCommandSet::default());
    // Only one word attempted.
    assert_eq!(spi.writes(), 1);
}

#[test]
fn cd_failure_is_a_partial_commit() {
    let journal = Journal::new();
    let (mut drv, spi) = driver(ChipId::B, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();
    journal.clear();

    spi.fail_nth_write(1);
    let fields = [field(true, true); 4];
    let r = drv.set_all_channels(fields, &mut delay);

    assert_eq!(r, Err(Error::PartialCommit(ChipId::B)));
    assert!(r.unwrap_err().is_hardware_desync());
    assert_eq!(journal.count_pin("strobe", true), 1);

    let attempted = IcCommandSet::from_fields(fields);
    let committed = drv.committed();
    assert_eq!(committed.word_ab, attempted.word_ab);
    assert_eq!(committed.word_cd, IcCommandSet::default().word_cd);
    assert_eq!(committed.field(ChannelId::A), fields[0]);
    assert_eq!(committed.field(ChannelId::C), ChannelField::default());
    assert_eq!(*drv.pending(), attempted);
}

#[test]
fn strobe_fault_still_drops_chip_select() {
    let journal = Journal::new();
    let pins = Drv8823Pins {
        cs: MockPin::new("cs_a", &journal),
        strobe: MockPin::stuck_low("strobe", &journal),
        reset: MockPin::new("nreset", &journal),
        sleep: MockPin::new("nsleep", &journal),
    };
    let spi = MockSpi::new(ChipId::A, &journal);
    let mut drv = Drv8823::new(ChipId::A, spi, pins, MotionConfig::default().timing);
    let mut delay = MockDelay::new(&journal);

    let r = drv.set_single_channel(ChannelId::A, field(true, true), &mut delay);

    assert_eq!(r, Err(Error::Gpio("strobe")));
    assert_eq!(journal.count_pin("cs_a", true), 1);
    assert_eq!(journal.level("cs_a"), Some(false));
    assert_eq!(*drv.committed(), IcCommandSet::default());
}

#[test]
fn single_channel_keeps_neighbour_bits() {
    let journal = Journal::new();
    let (mut drv, _spi) = driver(ChipId::A, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();

    let fields = [field(true, false), field(false, false), field(true, false), field(true, false)];
    drv.set_all_channels(fields, &mut delay).unwrap();
    let before = *drv.committed();
    journal.clear();

    drv.set_single_channel(ChannelId::B, field(true, true), &mut delay)
        .unwrap();

    let word = journal.words(ChipId::A)[0];
    assert_eq!(word & 0x003F, before.word_ab & 0x003F);
    assert_eq!(drv.committed().word_cd, before.word_cd);
    assert!(drv.committed().field(ChannelId::B).enable());
}

#[test]
fn single_channel_failure_leaves_committed() {
    let journal = Journal::new();
    let (mut drv, spi) = driver(ChipId::A, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();

    spi.fail_nth_write(0);
    let r = drv.set_single_channel(ChannelId::C, field(true, true), &mut delay);

    assert_eq!(r, Err(Error::TransferFailed(ChipId::A)));
    assert_eq!(*drv.committed(), IcCommandSet::default());
    assert!(drv.pending().field(ChannelId::C).enable());
}

#[test]
fn reset_sequence_order() {
    let journal = Journal::new();
    let (mut drv, _spi) = driver(ChipId::A, &journal);
    let mut delay = MockDelay::new(&journal);
    drv.init(&mut delay).unwrap();
    journal.clear();

    drv.reset(&mut delay).unwrap();

    assert_eq!(
        journal.events(),
        vec![
            pin("cs_a", false),
            pin("strobe", false),
            pin("nsleep", false),
            HwEvent::SpiEnable {
                chip: ChipId::A,
                on: false
            },
            pin("nreset", false),
            HwEvent::DelayMs(1),
            pin("nreset", true),
            HwEvent::SpiEnable {
                chip: ChipId::A,
                on: true
            },
        ]
    );
}

#[test]
fn wake_waits_for_charge_pump() {
    let journal = Journal::new();
    let (mut drv, _spi) = driver(ChipId::B, &journal);
    let mut delay = MockDelay::new(&journal);

    drv.sleep().unwrap();
    drv.wake(&mut delay).unwrap();

    assert_eq!(
        journal.events(),
        vec![pin("nsleep", false), pin("nsleep", true), HwEvent::DelayMs(2)]
    );
}
