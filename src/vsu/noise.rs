//! Noise channel (channel 6)
//!
//! A 15-bit linear-feedback shift register clocked by the same kind of
//! phase accumulator as the wavetable channels, at one tenth of their
//! increment. The feedback bit is bit 7 XOR a selectable tap; the output is
//! a fixed-amplitude pulse whenever the feedback bit is clear.

use super::channel::{period_elapsed, ChannelCore};
use super::constants::{noise_tap_offset, NOISE_CLOCK_INCREASE, NOISE_OUTPUT_HIGH, NOISE_SEED};

const SHIFT_REGISTER_MASK: u16 = 0x7FFF;

/// Channel 6 state.
#[derive(Debug, Clone, Default)]
pub struct NoiseChannel {
    /// Interval, stereo and envelope state
    pub core: ChannelCore,
    /// Host frequency register; not masked to 11 bits
    pub frequency: u32,
    /// Feedback tap selection (0-7)
    pub tap_select: u8,
    frequency_counter: u32,
    shift: u16,
    output: u8,
}

impl NoiseChannel {
    /// Create a silent channel with an empty shift register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the channel; enabling reseeds the shift register.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.core.interval.set_output_enabled(enabled);

        if enabled {
            self.core.envelope.reset_counter();
            self.frequency_counter = 0;
            self.shift = NOISE_SEED;
        }
    }

    /// Advance the noise accumulator by one chip cycle.
    #[inline]
    pub fn noise_clock(&mut self) {
        self.frequency_counter += NOISE_CLOCK_INCREASE;
        if period_elapsed(self.frequency_counter, self.frequency) {
            self.frequency_counter = 0;
            self.step();
        }
    }

    /// Run one LFSR step and return the feedback bit.
    fn step(&mut self) -> u16 {
        let lhs = self.shift >> 7;
        let rhs = self.shift >> noise_tap_offset(self.tap_select);
        let feedback = (lhs ^ rhs) & 0x01;

        self.shift = ((self.shift << 1) | feedback) & SHIFT_REGISTER_MASK;
        self.output = if feedback == 0 { NOISE_OUTPUT_HIGH } else { 0 };

        feedback
    }

    /// Current shift register contents.
    pub fn shift_register(&self) -> u16 {
        self.shift
    }

    /// Current output level (0 or 0x3F).
    #[inline]
    pub fn output(&self) -> u8 {
        self.output
    }
}
