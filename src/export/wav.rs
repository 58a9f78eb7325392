//! WAV file export functionality

use std::path::Path;

use crate::vsu::constants::SAMPLE_RATE;
use crate::vsu::AudioFrames;
use crate::{Result, VsuError};

/// Write stereo frames to a 16-bit PCM WAV file at the chip rate.
///
/// Samples are clamped to [-1, 1] before conversion.
pub fn write_wav<P: AsRef<Path>>(frames: &AudioFrames, path: P) -> Result<()> {
    let path = path.as_ref();
    tracing::info!(frames = frames.len(), path = %path.display(), "writing WAV");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| VsuError::AudioFileError(format!("Failed to create WAV file: {e}")))?;

    for sample in frames.interleaved() {
        writer
            .write_sample(to_i16(sample))
            .map_err(|e| VsuError::AudioFileError(format!("Failed to write sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| VsuError::AudioFileError(format!("Failed to finalize WAV file: {e}")))?;

    Ok(())
}

/// Convert a float sample to 16-bit PCM
fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
