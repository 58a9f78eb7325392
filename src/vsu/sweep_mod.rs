//! Sweep/modulation channel (channel 5)
//!
//! Plays a wavetable like the standard channels, but its phase accumulator
//! runs from `mod_frequency`, which a slower secondary clock rewrites either
//! by sweeping (shift-and-add/subtract) or by adding entries of the
//! modulation table to the host frequency. A computed frequency is applied
//! on the following secondary tick, never the one that computed it.

use super::channel::{period_elapsed, ChannelCore, WaveTables};
use super::constants::{
    FREQUENCY_CLOCK_INCREASE, FREQUENCY_PERIOD, NUM_MOD_DATA_WORDS, NUM_WAVEFORM_DATA_WORDS,
};
use super::standard::wave_sample;

/// Modulation table: 32 signed frequency offsets.
pub type ModTable = [i8; NUM_MOD_DATA_WORDS];

const MAX_MOD_PHASE: usize = NUM_MOD_DATA_WORDS - 1;
const SWEEP_SHIFT_MASK: u8 = 0x07;
const MODULATED_FREQUENCY_MASK: u32 = 0x07FF;
const SWEPT_FREQUENCY_MASK: u32 = 0xFFFF;

/// What the secondary clock does to the frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepModFunction {
    /// Shift-and-add/subtract pitch glide
    #[default]
    Sweep,
    /// Offset the host frequency by modulation table entries
    Modulation,
}

impl SweepModFunction {
    /// Function from a register bit (non-zero = modulation).
    pub fn from_bit(modulation: bool) -> Self {
        if modulation {
            SweepModFunction::Modulation
        } else {
            SweepModFunction::Sweep
        }
    }
}

/// One sweep step: `frequency ± (frequency >> shift)`, wrapped to 16 bits.
#[inline]
pub fn sweep_frequency(frequency: u32, shift: u8, up: bool) -> u32 {
    let delta = frequency >> (shift & SWEEP_SHIFT_MASK);
    let swept = if up {
        frequency.wrapping_add(delta)
    } else {
        frequency.wrapping_sub(delta)
    };
    swept & SWEPT_FREQUENCY_MASK
}

/// Channel 5 state.
#[derive(Debug, Clone, Default)]
pub struct SweepModChannel {
    /// Interval, stereo and envelope state
    pub core: ChannelCore,
    /// Host frequency register (base for modulation)
    pub frequency: u32,
    /// Selected wavetable; indices past the last table are silent
    pub waveform: u8,
    /// Secondary clock runs at the long (320 cycle) base interval
    pub base_interval_long: bool,
    /// Sweep/modulation unit enable
    pub sweep_mod_enabled: bool,
    /// Modulation restarts from the table start after the last entry
    pub repeat_modulation: bool,
    /// Sweep or modulation
    pub function: SweepModFunction,
    /// Sweep adds (true) or subtracts (false)
    pub sweep_up: bool,
    /// Secondary clocks between frequency updates
    pub sweep_mod_interval: u32,
    sweep_shift: u8,
    mod_frequency: u32,
    next_mod_frequency: u32,
    frequency_counter: u32,
    phase: usize,
    sweep_mod_counter: u32,
    mod_phase: usize,
}

impl SweepModChannel {
    /// Create a silent channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the channel; enabling restarts playback and the modulation walk.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.core.interval.set_output_enabled(enabled);

        if enabled {
            self.core.envelope.reset_counter();
            self.frequency_counter = 0;
            self.phase = 0;
            self.sweep_mod_counter = 0;
            self.mod_phase = 0;
        }
    }

    /// Load the playback frequency directly, bypassing the one-tick latency.
    pub fn set_mod_frequency(&mut self, frequency: u32) {
        self.mod_frequency = frequency;
        self.next_mod_frequency = frequency;
    }

    /// Set the sweep shift amount (3 bits).
    pub fn set_sweep_shift(&mut self, shift: u8) {
        self.sweep_shift = shift & SWEEP_SHIFT_MASK;
    }

    /// Sweep shift amount (3 bits).
    pub fn sweep_shift(&self) -> u8 {
        self.sweep_shift
    }

    /// Frequency currently driving the phase accumulator.
    pub fn mod_frequency(&self) -> u32 {
        self.mod_frequency
    }

    /// Frequency to be applied on the next secondary tick.
    pub fn next_mod_frequency(&self) -> u32 {
        self.next_mod_frequency
    }

    /// Current wavetable position (0-31).
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Current modulation table position (0-31).
    pub fn mod_phase(&self) -> usize {
        self.mod_phase
    }

    /// Advance the phase accumulator by one chip cycle.
    #[inline]
    pub fn frequency_clock(&mut self) {
        self.frequency_counter += FREQUENCY_CLOCK_INCREASE;
        if period_elapsed(self.frequency_counter, self.mod_frequency) {
            self.frequency_counter = 0;
            self.phase = (self.phase + 1) & (NUM_WAVEFORM_DATA_WORDS - 1);
        }
    }

    /// Advance the sweep/modulation unit by one secondary clock.
    pub fn sweep_mod_clock(&mut self, mod_data: &ModTable) {
        self.sweep_mod_counter += 1;
        if self.sweep_mod_counter < self.sweep_mod_interval {
            return;
        }
        self.sweep_mod_counter = 0;

        self.mod_frequency = self.next_mod_frequency;

        if self.mod_frequency >= FREQUENCY_PERIOD {
            if self.core.interval.output_enabled() {
                tracing::trace!(frequency = self.mod_frequency, "sweep overflow, channel 5 silenced");
            }
            self.core.interval.set_output_enabled(false);
        }

        if !self.core.interval.output_enabled()
            || !self.sweep_mod_enabled
            || self.sweep_mod_interval == 0
        {
            return;
        }

        self.next_mod_frequency = match self.function {
            SweepModFunction::Sweep => {
                sweep_frequency(self.mod_frequency, self.sweep_shift, self.sweep_up)
            }
            SweepModFunction::Modulation => {
                let offset = i32::from(mod_data[self.mod_phase]);
                let modulated = self.frequency.wrapping_add_signed(offset) & MODULATED_FREQUENCY_MASK;

                self.mod_phase = if !self.repeat_modulation && self.mod_phase == MAX_MOD_PHASE {
                    MAX_MOD_PHASE
                } else {
                    (self.mod_phase + 1) & MAX_MOD_PHASE
                };

                modulated
            }
        };
    }

    /// Sample at the current phase, or 0 for an out-of-range table.
    #[inline]
    pub fn output(&self, waveforms: &WaveTables) -> u8 {
        wave_sample(waveforms, self.waveform, self.phase)
    }
}
