//! TI DRV8823 quad H-bridge driver.
//!
//! One instance per chip. Owns the chip-select line and handles to the
//! strobe, nRESET and nSLEEP lines and the SPI bus. On the flow-controller
//! board strobe, nRESET, nSLEEP and the bus are shared by both chips; pass
//! shared handles (e.g. `RefCell`-backed wrappers) for those.
//!
//! ## Transfer framing
//!
//! ```text
//!  CS      ____/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\____
//!  MOSI    ____<  MSB byte  ><  LSB byte  >______
//!  STROBE  ______________________/‾‾‾‾‾\________
//!                                 strobe_delay_ms
//! ```
//!
//! A word only reaches the output stage on the strobe, so a failed SPI
//! write leaves the outputs at the previously latched word.

pub mod codec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{MODE_2, SpiBus};
use log::{debug, warn};

use self::codec::{ChannelField, ChannelId, IcCommandSet, Register};
use crate::app::ports::{BridgeDriver, BusControl};
use crate::config::DriverTiming;
use crate::error::{Error, Result};
use crate::manifold::valve_map::ChipId;

/// Control lines of one DRV8823.
pub struct Drv8823Pins<CS, STB, RST, SLP> {
    /// Chip select, active high.
    pub cs: CS,
    /// Latch strobe, rising edge.
    pub strobe: STB,
    /// nRESET, active low.
    pub reset: RST,
    /// nSLEEP, active low.
    pub sleep: SLP,
}

pub struct Drv8823<SPI, CS, STB, RST, SLP> {
    id: ChipId,
    spi: SPI,
    pins: Drv8823Pins<CS, STB, RST, SLP>,
    timing: DriverTiming,
    /// Words of the transfer in progress (or last attempted).
    pending: IcCommandSet,
    /// Words known to be latched into the chip.
    committed: IcCommandSet,
}

impl<SPI, CS, STB, RST, SLP> Drv8823<SPI, CS, STB, RST, SLP>
where
    SPI: SpiBus<u8> + BusControl,
    CS: OutputPin,
    STB: OutputPin,
    RST: OutputPin,
    SLP: OutputPin,
{
    pub fn new(id: ChipId, spi: SPI, pins: Drv8823Pins<CS, STB, RST, SLP>, timing: DriverTiming) -> Self {
        Self {
            id,
            spi,
            pins,
            timing,
            pending: IcCommandSet::default(),
            committed: IcCommandSet::default(),
        }
    }

    pub fn pending(&self) -> &IcCommandSet {
        &self.pending
    }

    pub fn committed(&self) -> &IcCommandSet {
        &self.committed
    }

    /// Clock one word out MSB first and strobe it into the outputs.
    fn write_word(&mut self, word: u16, delay: &mut impl DelayNs) -> Result<()> {
        debug!("DRV8823-{}: tx 0x{:04X}", self.id, word);
        self.pins.cs.set_high().map_err(|_| Error::Gpio("cs"))?;

        let sent = self
            .spi
            .write(&word.to_be_bytes())
            .and_then(|()| self.spi.flush());
        if sent.is_err() {
            // Word never strobed; drop CS and report the bus error.
            let _ = self.pins.cs.set_low();
            warn!("DRV8823-{}: SPI write of 0x{:04X} failed", self.id, word);
            return Err(Error::TransferFailed(self.id));
        }

        // CS is dropped even when the strobe line faults.
        let latched = self.strobe(delay);
        let released = self.pins.cs.set_low().map_err(|_| Error::Gpio("cs"));
        latched.and(released)?;
        debug!("DRV8823-{}: strobed 0x{:04X}", self.id, word);
        Ok(())
    }

    fn strobe(&mut self, delay: &mut impl DelayNs) -> Result<()> {
        self.pins.strobe.set_high().map_err(|_| Error::Gpio("strobe"))?;
        delay.delay_ms(self.timing.strobe_delay_ms);
        self.pins.strobe.set_low().map_err(|_| Error::Gpio("strobe"))
    }
}

impl<SPI, CS, STB, RST, SLP> BridgeDriver for Drv8823<SPI, CS, STB, RST, SLP>
where
    SPI: SpiBus<u8> + BusControl,
    CS: OutputPin,
    STB: OutputPin,
    RST: OutputPin,
    SLP: OutputPin,
{
    fn chip(&self) -> ChipId {
        self.id
    }

    /// CPOL=1 with capture on the first edge (SPI mode 2), lines parked,
    /// nRESET and nSLEEP released.
    fn init<D: DelayNs>(&mut self, _delay: &mut D) -> Result<()> {
        self.spi
            .configure(MODE_2)
            .map_err(|_| Error::TransferFailed(self.id))?;
        self.pins.cs.set_low().map_err(|_| Error::Gpio("cs"))?;
        self.pins.strobe.set_low().map_err(|_| Error::Gpio("strobe"))?;
        self.pins.reset.set_high().map_err(|_| Error::Gpio("nreset"))?;
        self.pins.sleep.set_high().map_err(|_| Error::Gpio("nsleep"))?;
        self.spi
            .enable()
            .map_err(|_| Error::TransferFailed(self.id))?;
        self.pending = IcCommandSet::default();
        self.committed = IcCommandSet::default();
        debug!("DRV8823-{}: init done", self.id);
        Ok(())
    }

    fn wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.pins.sleep.set_high().map_err(|_| Error::Gpio("nsleep"))?;
        delay.delay_ms(self.timing.wakeup_delay_ms);
        Ok(())
    }

    /// Outputs go high-impedance; latched valves hold position.
    fn sleep(&mut self) -> Result<()> {
        self.pins.sleep.set_low().map_err(|_| Error::Gpio("nsleep"))
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.pins.cs.set_low().map_err(|_| Error::Gpio("cs"))?;
        self.pins.strobe.set_low().map_err(|_| Error::Gpio("strobe"))?;
        self.sleep()?;
        self.spi
            .disable()
            .map_err(|_| Error::TransferFailed(self.id))?;
        self.pins.reset.set_low().map_err(|_| Error::Gpio("nreset"))?;
        delay.delay_ms(self.timing.reset_delay_ms);
        self.pins.reset.set_high().map_err(|_| Error::Gpio("nreset"))?;
        self.spi
            .enable()
            .map_err(|_| Error::TransferFailed(self.id))?;
        debug!("DRV8823-{}: reset", self.id);
        Ok(())
    }

    fn set_single_channel<D: DelayNs>(
        &mut self,
        channel: ChannelId,
        field: ChannelField,
        delay: &mut D,
    ) -> Result<()> {
        self.pending = self.committed;
        self.pending.merge(channel, field);
        self.write_word(self.pending.word(channel.register()), delay)?;
        self.committed = self.pending;
        Ok(())
    }

    /// If the AB word fails nothing latched and `TransferFailed` is
    /// returned. If AB latched and CD failed, channels A/B already run the
    /// new command; `committed` records that and `PartialCommit` is
    /// returned.
    fn set_all_channels<D: DelayNs>(&mut self, fields: [ChannelField; 4], delay: &mut D) -> Result<()> {
        self.pending = IcCommandSet::from_fields(fields);

        self.write_word(self.pending.word(Register::Ab), delay)?;

        if let Err(e) = self.write_word(self.pending.word(Register::Cd), delay) {
            for ch in [ChannelId::A, ChannelId::B] {
                self.committed.fields[ch.index()] = self.pending.field(ch);
            }
            self.committed.word_ab = self.pending.word_ab;
            warn!("DRV8823-{}: AB latched, CD failed ({})", self.id, e);
            return Err(Error::PartialCommit(self.id));
        }

        self.committed = self.pending;
        Ok(())
    }
}
