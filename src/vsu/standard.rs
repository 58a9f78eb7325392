//! Standard wavetable channel (channels 1-4)

use super::channel::{period_elapsed, ChannelCore, WaveTables};
use super::constants::{FREQUENCY_CLOCK_INCREASE, NUM_WAVEFORM_DATA_TABLES, NUM_WAVEFORM_DATA_WORDS};

/// Wavetable playback through a frequency-driven phase accumulator.
#[derive(Debug, Clone, Default)]
pub struct StandardChannel {
    /// Interval, stereo and envelope state
    pub core: ChannelCore,
    /// Host frequency register; not masked to 11 bits
    pub frequency: u32,
    /// Selected wavetable; indices past the last table are silent
    pub waveform: u8,
    frequency_counter: u32,
    phase: usize,
}

impl StandardChannel {
    /// Create a silent channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key the channel; enabling restarts playback from phase 0.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.core.interval.set_output_enabled(enabled);

        if enabled {
            self.core.envelope.reset_counter();
            self.frequency_counter = 0;
            self.phase = 0;
        }
    }

    /// Advance the phase accumulator by one chip cycle.
    #[inline]
    pub fn frequency_clock(&mut self) {
        self.frequency_counter += FREQUENCY_CLOCK_INCREASE;
        if period_elapsed(self.frequency_counter, self.frequency) {
            self.frequency_counter = 0;
            self.phase = (self.phase + 1) & (NUM_WAVEFORM_DATA_WORDS - 1);
        }
    }

    /// Current wavetable position (0-31).
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Sample at the current phase, or 0 for an out-of-range table.
    #[inline]
    pub fn output(&self, waveforms: &WaveTables) -> u8 {
        wave_sample(waveforms, self.waveform, self.phase)
    }
}

/// Look up a wavetable sample; tables past the last one read as silence.
#[inline]
pub(crate) fn wave_sample(waveforms: &WaveTables, waveform: u8, phase: usize) -> u8 {
    let table = usize::from(waveform);
    if table >= NUM_WAVEFORM_DATA_TABLES {
        return 0;
    }
    waveforms[table][phase]
}
