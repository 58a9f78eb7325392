//! VSU Output Mixer
//!
//! Combines the six channels into one stereo frame per chip cycle.
//!
//! Features:
//! - Per-side gain from stereo level × envelope level, with a +1 floor
//! - Integer accumulation of all enabled channels
//! - Low 3 bits discarded to match the hardware's output resolution
//! - Normalization by the fixed full-scale constant

use super::channel::{Channel, WaveTables};
use super::constants::MAX_OUTPUT_VALUE;

/// One stereo output sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoFrame {
    /// Left sample
    pub left: f32,
    /// Right sample
    pub right: f32,
}

/// Gain for one side of a channel.
///
/// Zero if either the stereo level or the envelope level is zero, otherwise
/// `((stereo * envelope) >> 3) + 1`.
#[inline]
pub fn side_gain(stereo_level: u8, envelope_level: u8) -> u32 {
    if stereo_level == 0 || envelope_level == 0 {
        0
    } else {
        ((u32::from(stereo_level) * u32::from(envelope_level)) >> 3) + 1
    }
}

/// Drop the low 3 bits of an accumulated side and rescale.
#[inline]
pub fn quantize(accumulated: u32) -> u32 {
    (accumulated & 0xFFF8) << 2
}

/// Map a quantized side to a float sample.
#[inline]
pub fn normalize(quantized: u32) -> f32 {
    quantized as f32 / MAX_OUTPUT_VALUE
}

/// Stateless sample mixer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mixer;

impl Mixer {
    /// Create a mixer
    pub fn new() -> Self {
        Mixer
    }

    /// Mix every enabled channel into one frame.
    #[inline]
    pub fn mix(&self, channels: &[Channel], waveforms: &WaveTables) -> StereoFrame {
        let mut left: u32 = 0;
        let mut right: u32 = 0;

        for channel in channels {
            if !channel.output_enabled() {
                continue;
            }

            let core = channel.core();
            let envelope_level = core.envelope.level();
            let sample = u32::from(channel.sample(waveforms));

            left += (sample * side_gain(core.stereo.left, envelope_level)) >> 1;
            right += (sample * side_gain(core.stereo.right, envelope_level)) >> 1;
        }

        StereoFrame {
            left: normalize(quantize(left)),
            right: normalize(quantize(right)),
        }
    }
}

/// Stereo output of an advance call: two equal-length sample sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioFrames {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl AudioFrames {
    /// Allocate `len` silent frames.
    pub fn new(len: usize) -> Self {
        AudioFrames {
            left: vec![0.0; len],
            right: vec![0.0; len],
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Resize to `len` frames, zero-filling any new ones.
    pub fn resize(&mut self, len: usize) {
        self.left.resize(len, 0.0);
        self.right.resize(len, 0.0);
    }

    /// Left channel samples.
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Frame at `index`, if in range.
    pub fn frame(&self, index: usize) -> Option<StereoFrame> {
        Some(StereoFrame {
            left: *self.left.get(index)?,
            right: *self.right.get(index)?,
        })
    }

    /// Store a frame at `index`.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, frame: StereoFrame) {
        self.left[index] = frame.left;
        self.right[index] = frame.right;
    }

    /// Append another span's frames.
    pub fn extend_from(&mut self, other: &AudioFrames) {
        self.left.extend_from_slice(&other.left);
        self.right.extend_from_slice(&other.right);
    }

    /// Frames in order.
    pub fn iter(&self) -> impl Iterator<Item = StereoFrame> + '_ {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(&left, &right)| StereoFrame { left, right })
    }

    /// Samples interleaved as L, R, L, R, ...
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 2);
        for (&l, &r) in self.left.iter().zip(&self.right) {
            out.push(l);
            out.push(r);
        }
        out
    }
}
