//! Stream configuration
//!
//! How the chip is driven: how many frames each advance call produces and how
//! much interleaved audio the playback ring buffer holds. The sample rate is
//! the chip's own; it is carried here so sinks can describe their output.

use serde::{Deserialize, Serialize};

use crate::vsu::constants::SAMPLE_RATE;
use crate::{Result, VsuError};

/// Frames per advance call when not otherwise configured.
pub const DEFAULT_BUFFER_FRAMES: usize = 128;

/// Configuration for driving the chip and streaming its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Sample rate in Hz (the chip rate)
    pub sample_rate: u32,

    /// Number of audio channels
    pub channels: u16,

    /// Frames produced per advance call; register writes land between calls
    pub buffer_frames: usize,

    /// Size of the ring buffer (in interleaved samples)
    pub ring_buffer_size: usize,
}

impl StreamConfig {
    /// Configuration optimized for low latency
    /// Ring buffer = 4096 samples ≈ 49ms of stereo @ 41.7kHz
    pub fn low_latency() -> Self {
        StreamConfig {
            sample_rate: SAMPLE_RATE,
            channels: 2,
            buffer_frames: DEFAULT_BUFFER_FRAMES,
            ring_buffer_size: 4096,
        }
    }

    /// Configuration optimized for stability
    /// Ring buffer = 16384 samples ≈ 197ms of stereo @ 41.7kHz
    pub fn stable() -> Self {
        StreamConfig {
            ring_buffer_size: 16384,
            ..Self::low_latency()
        }
    }

    /// Override the frames per advance call
    pub fn with_buffer_frames(mut self, buffer_frames: usize) -> Self {
        self.buffer_frames = buffer_frames;
        self
    }

    /// Check the configuration can drive a stream
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate != SAMPLE_RATE {
            return Err(VsuError::ConfigError(format!(
                "sample rate {} Hz is not the chip rate {SAMPLE_RATE} Hz",
                self.sample_rate
            )));
        }
        if self.channels != 2 {
            return Err(VsuError::ConfigError(format!(
                "output is stereo, got {} channels",
                self.channels
            )));
        }
        if self.buffer_frames == 0 {
            return Err(VsuError::ConfigError(
                "buffer_frames must be greater than 0".into(),
            ));
        }
        let min_ring = self
            .buffer_frames
            .checked_mul(usize::from(self.channels) * 2)
            .ok_or_else(|| {
                VsuError::ConfigError(format!("buffer_frames {} is too large", self.buffer_frames))
            })?;
        if self.ring_buffer_size < min_ring {
            return Err(VsuError::ConfigError(format!(
                "ring buffer of {} samples cannot hold two buffers ({min_ring} samples)",
                self.ring_buffer_size
            )));
        }
        Ok(())
    }

    /// Get ring buffer latency in milliseconds
    pub fn latency_ms(&self) -> f32 {
        let frames = self.ring_buffer_size as f32 / f32::from(self.channels.max(1));
        (frames / self.sample_rate as f32) * 1000.0
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::stable()
    }
}
