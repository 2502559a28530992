//! Valve manifold orchestrator.
//!
//! [`MotionControl`] composes the two bridge drivers, the valve map, the
//! preset table and the pump relay into a mode-select actuator.
//!
//! ## Actuation sequence
//!
//! ```text
//!  wake A,B ─▶ route preset ─▶ pulse A,B ─▶ hold pulse width ─▶ release A,B
//!                                                                   │
//!        reset+sleep A,B ◀── relay, mirror, mode (success only) ◀───┘
//! ```
//!
//! Latching valves only need current while they move, so every actuation
//! energises the coils for the pulse width and then releases them. Reset
//! and sleep run whatever the outcome.
//!
//! Single caller, blocking. A long pulse width holds the caller for that
//! long; servicing any watchdog around it is the caller's job.

pub mod state;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;
use log::{error, info, warn};

pub use self::state::ControllerState;
use crate::app::ports::BridgeDriver;
use crate::config::MotionConfig;
use crate::drivers::drv8823::codec::{ChannelField, ChannelId};
use crate::drivers::relay::Relay;
use crate::error::{Error, Result};
use crate::manifold::mode::Mode;
use crate::manifold::presets::{Preset, PresetId, PresetTable};
use crate::manifold::valve_map::{self, ChipId, VALVE_MAP};

/// Current level for single-valve overrides and panic recovery.
pub const OVERRIDE_CURRENT: u8 = 4;

/// Pulse widths swept by [`MotionControl::panic_recover`], in order.
pub const PANIC_PULSE_WIDTHS_MS: [u32; 24] = [
    10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100, //
    100, 100, 100, 100, 100,
];

/// Per-chip channel fields, indexed by `ChipId::index()`.
type ChipFields = [[ChannelField; 4]; 2];

pub struct MotionControl<A, B, R, D> {
    drv_a: A,
    drv_b: B,
    relay: Relay<R>,
    delay: D,
    config: MotionConfig,
    presets: PresetTable,
    pulse_width_ms: u32,
    mode: Mode,
    /// What the valves and pump were last commanded to.
    current: Preset,
    state: ControllerState,
}

impl<A, B, R, D> MotionControl<A, B, R, D>
where
    A: BridgeDriver,
    B: BridgeDriver,
    R: OutputPin,
    D: DelayNs,
{
    /// Build an uninitialised controller. Fails if `config` does not
    /// validate or the drivers are not chips A and B.
    pub fn new(config: MotionConfig, drv_a: A, drv_b: B, relay: Relay<R>, delay: D) -> Result<Self> {
        config.validate()?;
        if drv_a.chip() != ChipId::A || drv_b.chip() != ChipId::B {
            return Err(Error::InvalidParameter("drivers must be chips A and B in order"));
        }
        let presets = PresetTable::seeded(config.nominal_current, config.fast_decay);
        let current = *presets.get(PresetId::Rest);
        Ok(Self {
            drv_a,
            drv_b,
            relay,
            delay,
            config,
            pulse_width_ms: config.pulse_width_ms,
            presets,
            mode: Mode::Rest,
            current,
            state: ControllerState::Uninitialized,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Reseed the presets, bring up both drivers and the relay (off), then
    /// put the drivers to sleep. No valve is moved: the mirror is set to
    /// Rest on trust.
    pub fn init(&mut self) -> Result<()> {
        self.presets = PresetTable::seeded(self.config.nominal_current, self.config.fast_decay);
        self.drv_a.init(&mut self.delay)?;
        self.drv_b.init(&mut self.delay)?;
        self.relay.init()?;
        self.drv_a.sleep()?;
        self.drv_b.sleep()?;

        self.current = *self.presets.get(PresetId::Rest);
        self.mode = Mode::Rest;
        self.state = ControllerState::Idle(Mode::Rest);
        info!(
            "Motion control ready: mode={} pulse={}ms current={}",
            self.mode,
            self.pulse_width_ms,
            self.presets.get_current()
        );
        Ok(())
    }

    pub fn sleep_drivers(&mut self) -> Result<()> {
        self.drv_a.sleep()?;
        self.drv_b.sleep()
    }

    // ── Mode selection ────────────────────────────────────────

    /// Drive the manifold to `requested`.
    ///
    /// The active mode, relay and mirror change only if every word of both
    /// phases latched. On failure the previous mode is kept and the state
    /// becomes `Fault`; check `is_hardware_desync()` on the error.
    ///
    /// Once both phases latched the call succeeds even if the closing
    /// reset or sleep fails; that is logged and the next actuation wakes
    /// and resets the chips again.
    pub fn set_mode(&mut self, requested: Mode) -> Result<()> {
        self.ensure_initialized()?;
        let from = self.mode;
        self.state = ControllerState::Actuating;

        let outcome = self.actuate(requested);
        let settled = self.settle();

        match outcome {
            Ok(()) => {
                if let Err(e) = settled {
                    warn!("Mode {} latched but drivers did not settle: {}", self.mode, e);
                }
                self.state = ControllerState::Idle(self.mode);
                info!("Mode {} -> {} (pump {})", from, self.mode, on_off(self.current.pump));
                Ok(())
            }
            Err(e) => {
                self.state = ControllerState::Fault {
                    last_good: self.mode,
                    error: e,
                };
                if e.is_hardware_desync() {
                    error!("Mode {} -> {} failed: {}; valves may not match {}", from, requested, e, self.mode);
                } else {
                    warn!("Mode {} -> {} failed: {}", from, requested, e);
                }
                Err(e)
            }
        }
    }

    /// Wake, pulse, hold, release, then commit relay, mirror and mode.
    fn actuate(&mut self, requested: Mode) -> Result<()> {
        self.drv_a.wake(&mut self.delay)?;
        self.drv_b.wake(&mut self.delay)?;

        let mut preset = *self.presets.for_mode(requested);
        let pulse = route(&preset, true)?;
        let release = route(&preset, false)?;

        self.set_both(pulse)?;
        self.delay.delay_ms(self.pulse_width_ms);
        self.set_both(release)?;

        if let Some(pump) = requested.pump_bit() {
            preset.pump = pump;
        }
        self.relay.set(preset.pump)?;
        self.current = preset;
        self.mode = requested;
        Ok(())
    }

    fn set_both(&mut self, fields: ChipFields) -> Result<()> {
        self.drv_a
            .set_all_channels(fields[ChipId::A.index()], &mut self.delay)?;
        self.drv_b
            .set_all_channels(fields[ChipId::B.index()], &mut self.delay)
    }

    /// Reset then sleep both drivers. Every step runs; the first error wins.
    fn settle(&mut self) -> Result<()> {
        let a = self.drv_a.reset(&mut self.delay);
        let b = self.drv_b.reset(&mut self.delay);
        let sa = self.drv_a.sleep();
        let sb = self.drv_b.sleep();
        a.and(b).and(sa).and(sb)
    }

    // ── Pump ──────────────────────────────────────────────────

    /// Flip the pump without moving any valve. A paired mode becomes its
    /// pump twin; other modes keep their code.
    pub fn toggle_pump(&mut self) -> Result<bool> {
        self.ensure_initialized()?;
        let on = !self.current.pump;
        self.relay.set(on)?;
        self.current.pump = on;
        if let Some(partner) = self.mode.pump_partner() {
            self.mode = partner;
            match &mut self.state {
                ControllerState::Idle(mode) | ControllerState::Fault { last_good: mode, .. } => *mode = partner,
                ControllerState::Uninitialized | ControllerState::Actuating => {}
            }
        }
        info!("Pump {} (mode {})", on_off(on), self.mode);
        Ok(on)
    }

    pub fn get_pump(&self) -> bool {
        self.current.pump
    }

    // ── Settings ──────────────────────────────────────────────

    /// Drive current for every preset. Takes effect on the next actuation.
    pub fn set_current(&mut self, level: u8) -> Result<()> {
        self.presets.set_global_current(level)?;
        info!("Drive current set to {}", level);
        Ok(())
    }

    pub fn get_current(&self) -> u8 {
        self.presets.get_current()
    }

    pub fn set_pulse_width_ms(&mut self, ms: u32) -> Result<()> {
        if ms < self.config.min_pulse_width_ms {
            return Err(Error::InvalidParameter("pulse width below minimum"));
        }
        self.pulse_width_ms = ms;
        info!("Pulse width set to {}ms", ms);
        Ok(())
    }

    pub fn get_pulse_width_ms(&self) -> u32 {
        self.pulse_width_ms
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    /// Commanded direction of one valve, `true` = A-C. `None` past V8.
    pub fn get_valve_direction(&self, valve: usize) -> Option<bool> {
        self.current.valves.get(valve).map(|v| v.direction)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    /// One letter per valve (`A` = A-C, `B` = B-C) then the pump digit,
    /// e.g. `ABBAAABB0`.
    pub fn state_summary(&self) -> String<16> {
        self.current
            .valves
            .iter()
            .map(|v| if v.direction { 'A' } else { 'B' })
            .chain(core::iter::once(if self.current.pump { '1' } else { '0' }))
            .collect()
    }

    pub fn driver_a(&self) -> &A {
        &self.drv_a
    }

    pub fn driver_b(&self) -> &B {
        &self.drv_b
    }

    pub fn relay(&self) -> &Relay<R> {
        &self.relay
    }

    // ── Diagnostics ───────────────────────────────────────────

    /// Move one valve, bypassing the preset table.
    ///
    /// Pulses the valve's channel at [`OVERRIDE_CURRENT`] for the pulse
    /// width, then releases it. Only that valve's mirrored direction
    /// changes; the active mode is left alone.
    pub fn set_valve(&mut self, valve: usize, direction: bool) -> Result<()> {
        self.ensure_initialized()?;
        let entry =
            valve_map::route(valve).ok_or(Error::InvalidParameter("valve index out of range"))?;
        let on = ChannelField::new(self.config.fast_decay, OVERRIDE_CURRENT, direction, true)?;
        let off = on.with_enable(false);
        let width = self.pulse_width_ms;

        let result = match entry.chip {
            ChipId::A => single_pulse(&mut self.drv_a, &mut self.delay, entry.channel, on, off, width),
            ChipId::B => single_pulse(&mut self.drv_b, &mut self.delay, entry.channel, on, off, width),
        };

        match result {
            Ok(()) => {
                self.current.valves[valve].direction = direction;
                info!("Valve V{} -> {}", valve + 1, if direction { "A" } else { "B" });
                Ok(())
            }
            Err(e) => {
                warn!("Valve V{} override failed: {}", valve + 1, e);
                Err(e)
            }
        }
    }

    /// Exercise every valve both ways at each width in
    /// [`PANIC_PULSE_WIDTHS_MS`] to free a stuck spool, then re-run
    /// [`init`](Self::init).
    ///
    /// Each width runs four steps on both chips: forward enabled, release,
    /// reverse enabled, release, each followed by a wait of that width.
    /// Step failures are logged and counted, never abort the sweep.
    /// Returns the number of failed chip commands.
    pub fn panic_recover(&mut self) -> Result<u32> {
        self.ensure_initialized()?;
        warn!("Panic recovery: sweeping {} pulse widths", PANIC_PULSE_WIDTHS_MS.len());
        self.state = ControllerState::Actuating;
        let mut failures = 0u32;

        if let Err(e) = self.drv_a.wake(&mut self.delay).and(self.drv_b.wake(&mut self.delay)) {
            warn!("Panic recovery: wake failed: {}", e);
            failures += 1;
        }

        for width in PANIC_PULSE_WIDTHS_MS {
            for (phase, enable) in [(true, true), (true, false), (false, true), (false, false)] {
                let field = ChannelField::new(true, OVERRIDE_CURRENT, phase, enable)?;
                let fields = [field; 4];
                if let Err(e) = self.drv_a.set_all_channels(fields, &mut self.delay) {
                    warn!("Panic recovery: {}ms step on A failed: {}", width, e);
                    failures += 1;
                }
                if let Err(e) = self.drv_b.set_all_channels(fields, &mut self.delay) {
                    warn!("Panic recovery: {}ms step on B failed: {}", width, e);
                    failures += 1;
                }
                self.delay.delay_ms(width);
            }
        }

        if let Err(e) = self.init() {
            self.state = ControllerState::Fault {
                last_good: self.mode,
                error: e,
            };
            error!("Panic recovery: re-init failed: {}", e);
            return Err(e);
        }
        info!("Panic recovery complete ({} failed steps)", failures);
        Ok(failures)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.state.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}

/// Expand a preset through the valve map into per-chip channel fields.
/// Validates every valve before anything is sent.
fn route(preset: &Preset, enable: bool) -> Result<ChipFields> {
    let mut fields: ChipFields = [[ChannelField::default(); 4]; 2];
    for (target, entry) in preset.valves.iter().zip(VALVE_MAP) {
        fields[entry.chip.index()][entry.channel.index()] = target.field(enable)?;
    }
    Ok(fields)
}

/// Wake, pulse one channel, hold, release, then reset and sleep the chip.
fn single_pulse<Dr: BridgeDriver, D: DelayNs>(
    drv: &mut Dr,
    delay: &mut D,
    channel: ChannelId,
    on: ChannelField,
    off: ChannelField,
    width_ms: u32,
) -> Result<()> {
    let moved = drv.wake(delay).and_then(|()| {
        drv.set_single_channel(channel, on, delay)?;
        delay.delay_ms(width_ms);
        drv.set_single_channel(channel, off, delay)
    });
    let settled = drv.reset(delay).and_then(|()| drv.sleep());
    moved.and(settled)
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
