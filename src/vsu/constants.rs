//! VSU Hardware Constants
//!
//! Clock dividers, accumulator increments and table geometry shared across
//! the channel, envelope and mixer components.

/// Native output rate in Hz. One chip cycle produces one stereo frame.
pub const SAMPLE_RATE: u32 = 41_667;

/// Full-scale value used to normalize the quantized mixer output.
pub const MAX_OUTPUT_VALUE: f32 = 21_888.0;

/// Chip cycles between two duration (interval) timer ticks.
pub const DURATION_CLOCK_PERIOD: u32 = 160;

/// Chip cycles between two envelope ticks.
pub const ENVELOPE_CLOCK_PERIOD: u32 = 640;

/// Sweep/modulation clock period when the short base interval is selected.
pub const SWEEP_MOD_SMALL_PERIOD: u32 = 40;

/// Sweep/modulation clock period when the long base interval is selected.
pub const SWEEP_MOD_LARGE_PERIOD: u32 = 320;

/// Phase accumulator increment of the wavetable channels.
pub const FREQUENCY_CLOCK_INCREASE: u32 = 120;

/// Phase accumulator increment of the noise channel.
pub const NOISE_CLOCK_INCREASE: u32 = 12;

/// Accumulator period reference: a channel steps once its counter reaches
/// `FREQUENCY_PERIOD - frequency`.
pub const FREQUENCY_PERIOD: u32 = 2048;

/// Samples per wavetable.
pub const NUM_WAVEFORM_DATA_WORDS: usize = 32;

/// Number of wavetables in wave RAM.
pub const NUM_WAVEFORM_DATA_TABLES: usize = 5;

/// Entries in the modulation table.
pub const NUM_MOD_DATA_WORDS: usize = 32;

/// Number of sound channels.
pub const NUM_CHANNELS: usize = 6;

/// Highest envelope / stereo level.
pub const MAX_LEVEL: u8 = 15;

/// Amplitude of a high noise output bit.
pub const NOISE_OUTPUT_HIGH: u8 = 0x3F;

/// Noise shift register seed (all 15 bits set).
pub const NOISE_SEED: u16 = 0x7FFF;

/// Feedback tap bit position for each noise tap selection (0-7).
pub const NOISE_TAP_OFFSETS: [u32; 8] = [14, 10, 13, 4, 8, 6, 9, 11];

/// Bit position of the noise tap for a raw tap selection.
///
/// Selections past the table fall through to the last tap, as the
/// hardware's default arm does.
#[inline]
pub fn noise_tap_offset(tap_select: u8) -> u32 {
    NOISE_TAP_OFFSETS[usize::from(tap_select).min(NOISE_TAP_OFFSETS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_offsets_in_register_range() {
        for offset in NOISE_TAP_OFFSETS {
            assert!(offset < 15, "Tap {offset} lies outside the 15-bit register");
        }
    }

    #[test]
    fn test_out_of_range_tap_uses_last_offset() {
        assert_eq!(noise_tap_offset(0), 14);
        assert_eq!(noise_tap_offset(7), 11);
        assert_eq!(noise_tap_offset(8), 11);
        assert_eq!(noise_tap_offset(0xFF), 11);
    }

    #[test]
    fn test_clock_periods_match_sample_rate() {
        // 40 cycles at 41667 Hz is the 0.96 ms short sweep/mod interval
        let short_ms = SWEEP_MOD_SMALL_PERIOD as f32 * 1000.0 / SAMPLE_RATE as f32;
        assert!((short_ms - 0.96).abs() < 0.01, "short interval {short_ms} ms");
        assert_eq!(SWEEP_MOD_LARGE_PERIOD, SWEEP_MOD_SMALL_PERIOD * 8);
        assert_eq!(ENVELOPE_CLOCK_PERIOD, DURATION_CLOCK_PERIOD * 4);
    }
}
