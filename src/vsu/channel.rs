//! Sound channel variants
//!
//! All six channels share an interval register, a stereo level pair and an
//! envelope. They differ only in how the frequency clock advances them and
//! how a raw sample is produced, so the three kinds are a closed enum that
//! dispatches those operations.

use super::constants::{MAX_LEVEL, NUM_WAVEFORM_DATA_TABLES, NUM_WAVEFORM_DATA_WORDS};
use super::envelope::Envelope;
use super::interval::IntervalRegister;
use super::noise::NoiseChannel;
use super::standard::StandardChannel;
use super::sweep_mod::SweepModChannel;

/// Wave RAM: five 32-sample tables of 6-bit unsigned samples.
pub type WaveTables = [[u8; NUM_WAVEFORM_DATA_WORDS]; NUM_WAVEFORM_DATA_TABLES];

/// Left/right output levels of a channel (0-15 each).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoLevel {
    /// Left level
    pub left: u8,
    /// Right level
    pub right: u8,
}

impl StereoLevel {
    /// Build a level pair, masking each side to 4 bits.
    pub fn new(left: u8, right: u8) -> Self {
        StereoLevel {
            left: left & MAX_LEVEL,
            right: right & MAX_LEVEL,
        }
    }
}

impl Default for StereoLevel {
    fn default() -> Self {
        StereoLevel {
            left: MAX_LEVEL,
            right: MAX_LEVEL,
        }
    }
}

/// State common to every channel kind.
#[derive(Debug, Clone, Default)]
pub struct ChannelCore {
    /// Duration timer and output-enable flag
    pub interval: IntervalRegister,
    /// Stereo levels
    pub stereo: StereoLevel,
    /// Envelope generator
    pub envelope: Envelope,
}

/// One of the six VSU channels.
#[derive(Debug, Clone)]
pub enum Channel {
    /// Wavetable channel (1-4)
    Standard(StandardChannel),
    /// Wavetable channel with sweep/modulation unit (5)
    SweepMod(SweepModChannel),
    /// Noise channel (6)
    Noise(NoiseChannel),
}

impl Channel {
    /// Shared channel state.
    #[inline]
    pub fn core(&self) -> &ChannelCore {
        match self {
            Channel::Standard(ch) => &ch.core,
            Channel::SweepMod(ch) => &ch.core,
            Channel::Noise(ch) => &ch.core,
        }
    }

    /// Mutable shared channel state.
    #[inline]
    pub fn core_mut(&mut self) -> &mut ChannelCore {
        match self {
            Channel::Standard(ch) => &mut ch.core,
            Channel::SweepMod(ch) => &mut ch.core,
            Channel::Noise(ch) => &mut ch.core,
        }
    }

    /// Key the channel on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Channel::Standard(ch) => ch.set_enabled(enabled),
            Channel::SweepMod(ch) => ch.set_enabled(enabled),
            Channel::Noise(ch) => ch.set_enabled(enabled),
        }
    }

    /// Advance the channel's frequency (or noise) accumulator by one cycle.
    #[inline]
    pub fn frequency_clock(&mut self) {
        match self {
            Channel::Standard(ch) => ch.frequency_clock(),
            Channel::SweepMod(ch) => ch.frequency_clock(),
            Channel::Noise(ch) => ch.noise_clock(),
        }
    }

    /// Raw sample (0-63) before envelope and stereo gain.
    #[inline]
    pub fn sample(&self, waveforms: &WaveTables) -> u8 {
        match self {
            Channel::Standard(ch) => ch.output(waveforms),
            Channel::SweepMod(ch) => ch.output(waveforms),
            Channel::Noise(ch) => ch.output(),
        }
    }

    /// Host frequency register.
    pub fn frequency(&self) -> u32 {
        match self {
            Channel::Standard(ch) => ch.frequency,
            Channel::SweepMod(ch) => ch.frequency,
            Channel::Noise(ch) => ch.frequency,
        }
    }

    /// Write the host frequency register (unmasked).
    pub fn set_frequency(&mut self, frequency: u32) {
        match self {
            Channel::Standard(ch) => ch.frequency = frequency,
            Channel::SweepMod(ch) => ch.frequency = frequency,
            Channel::Noise(ch) => ch.frequency = frequency,
        }
    }

    /// Select a wavetable. Ignored by the noise channel.
    pub fn set_waveform(&mut self, waveform: u8) {
        match self {
            Channel::Standard(ch) => ch.waveform = waveform,
            Channel::SweepMod(ch) => ch.waveform = waveform,
            Channel::Noise(_) => {}
        }
    }

    /// Whether the channel currently reaches the mixer.
    #[inline]
    pub fn output_enabled(&self) -> bool {
        self.core().interval.output_enabled()
    }
}

/// True once a phase counter has covered the period for `frequency`.
///
/// Frequencies past the nominal 11-bit range leave a non-positive period,
/// which steps on every clock.
#[inline]
pub(crate) fn period_elapsed(counter: u32, frequency: u32) -> bool {
    u64::from(counter) + u64::from(frequency) >= u64::from(super::constants::FREQUENCY_PERIOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_default_full() {
        let lrv = StereoLevel::default();
        assert_eq!((lrv.left, lrv.right), (15, 15));
    }

    #[test]
    fn test_stereo_masked() {
        let lrv = StereoLevel::new(0x1F, 0x20);
        assert_eq!((lrv.left, lrv.right), (15, 0));
    }

    #[test]
    fn test_period_elapsed_inverse_relation() {
        assert!(!period_elapsed(2040, 0));
        assert!(period_elapsed(2048, 0));
        assert!(period_elapsed(48, 2000));
        assert!(!period_elapsed(47, 2000));
    }

    #[test]
    fn test_period_elapsed_out_of_range_frequency() {
        assert!(period_elapsed(0, 2048));
        assert!(period_elapsed(0, u32::MAX));
    }

    #[test]
    fn test_dispatch_reaches_variant() {
        let mut channel = Channel::Noise(NoiseChannel::new());
        channel.set_frequency(1234);
        assert_eq!(channel.frequency(), 1234);
        channel.set_waveform(2);
        channel.set_enabled(true);
        assert!(channel.output_enabled());
        channel.core_mut().interval.set_output_enabled(false);
        assert!(!channel.output_enabled());
    }
}
