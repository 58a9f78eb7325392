//! Audio device output using rodio
//!
//! A rodio `Source` pulls stereo frames from the ring buffer in batches,
//! yields them as interleaved samples and plays silence whenever the
//! producer falls behind.

use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::RingBuffer;
use crate::config::StreamConfig;
use crate::vsu::StereoFrame;
use crate::{Result, VsuError};

/// Frames pulled from the ring per lock
const SOURCE_BATCH: usize = 2048;

/// Interleaved samples per frame
const OUTPUT_CHANNELS: u16 = 2;

/// rodio source reading from the ring buffer
struct RingBufferSource {
    ring_buffer: Arc<RingBuffer>,
    sample_rate: u32,
    finished: Arc<AtomicBool>,
    batch: Vec<StereoFrame>,
    batch_len: usize,
    /// Next sample as `frame * 2 + side`
    cursor: usize,
}

impl RingBufferSource {
    fn new(ring_buffer: Arc<RingBuffer>, sample_rate: u32, finished: Arc<AtomicBool>) -> Self {
        RingBufferSource {
            ring_buffer,
            sample_rate,
            finished,
            batch: vec![StereoFrame::default(); SOURCE_BATCH],
            batch_len: 0,
            cursor: 0,
        }
    }
}

impl Source for RingBufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        let available = self.ring_buffer.available_read();
        if available > 0 {
            Some(available * usize::from(OUTPUT_CHANNELS))
        } else {
            Some(SOURCE_BATCH * usize::from(OUTPUT_CHANNELS))
        }
    }

    fn channels(&self) -> u16 {
        OUTPUT_CHANNELS
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for RingBufferSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.cursor >= self.batch_len * 2 {
            self.cursor = 0;
            self.batch_len = self.ring_buffer.read(&mut self.batch);

            if self.batch_len == 0 {
                if self.finished.load(Ordering::Relaxed) {
                    return None;
                }
                // Underrun: one frame of silence keeps the stream alive
                self.batch[0] = StereoFrame::default();
                self.batch_len = 1;
            }
        }

        let frame = self.batch[self.cursor / 2];
        let sample = if self.cursor % 2 == 0 {
            frame.left
        } else {
            frame.right
        };
        self.cursor += 1;
        Some(sample)
    }
}

/// Playback device fed from a ring buffer
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    finished: Arc<AtomicBool>,
}

impl AudioDevice {
    /// Open the default output device and start playing from `ring_buffer`.
    pub fn new(config: &StreamConfig, ring_buffer: Arc<RingBuffer>) -> Result<Self> {
        config.validate()?;

        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            VsuError::AudioDeviceError(format!("Failed to create audio stream: {e}"))
        })?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| VsuError::AudioDeviceError(format!("Failed to create audio sink: {e}")))?;

        let finished = Arc::new(AtomicBool::new(false));
        sink.append(RingBufferSource::new(
            ring_buffer,
            config.sample_rate,
            Arc::clone(&finished),
        ));

        tracing::debug!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            "audio device opened"
        );

        Ok(AudioDevice {
            _stream: stream,
            sink,
            finished,
        })
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// Signal that no more samples will be produced; playback ends once the
    /// ring buffer drains
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }

    /// Block until the source has ended
    pub fn wait_for_finish(&self) {
        self.sink.sleep_until_end();
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.sink.pause();
        tracing::debug!("audio device closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(ring: &Arc<RingBuffer>, finished: &Arc<AtomicBool>) -> RingBufferSource {
        RingBufferSource::new(Arc::clone(ring), 41_667, Arc::clone(finished))
    }

    fn frame(left: f32, right: f32) -> StereoFrame {
        StereoFrame { left, right }
    }

    #[test]
    fn test_audio_device_creation() {
        let ring = Arc::new(RingBuffer::new(4096).unwrap());
        match AudioDevice::new(&StreamConfig::default(), ring) {
            Ok(device) => device.finish(),
            Err(err) => {
                eprintln!("Skipping audio device test (audio backend unavailable): {err}");
            }
        }
    }

    #[test]
    fn test_audio_device_rejects_invalid_config() {
        let ring = Arc::new(RingBuffer::new(64).unwrap());
        let config = StreamConfig {
            channels: 8192,
            ..StreamConfig::default()
        };
        let err = AudioDevice::new(&config, ring).err();
        assert!(
            matches!(err, Some(VsuError::ConfigError(_))),
            "Config is checked before the device is opened"
        );
    }

    #[test]
    fn test_source_reports_format() {
        let ring = Arc::new(RingBuffer::new(64).unwrap());
        let src = source(&ring, &Arc::new(AtomicBool::new(false)));
        assert_eq!(src.sample_rate(), 41_667);
        assert_eq!(src.channels(), 2);
        assert!(src.total_duration().is_none());
    }

    #[test]
    fn test_source_silence_on_underrun() {
        let ring = Arc::new(RingBuffer::new(64).unwrap());
        let mut src = source(&ring, &Arc::new(AtomicBool::new(false)));
        assert_eq!(src.next(), Some(0.0), "Empty ring plays silence");
        assert_eq!(src.next(), Some(0.0));
    }

    #[test]
    fn test_source_interleaves_then_pads() {
        let ring = Arc::new(RingBuffer::new(64).unwrap());
        ring.write(&[frame(0.5, -0.5), frame(0.25, -0.25)]);
        let mut src = source(&ring, &Arc::new(AtomicBool::new(false)));
        let samples: Vec<f32> = (0..6).filter_map(|_| src.next()).collect();
        assert_eq!(samples, vec![0.5, -0.5, 0.25, -0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_underrun_keeps_sides_aligned() {
        let ring = Arc::new(RingBuffer::new(64).unwrap());
        let mut src = source(&ring, &Arc::new(AtomicBool::new(false)));

        assert_eq!(src.next(), Some(0.0));
        ring.write(&[frame(0.5, -0.5)]);
        assert_eq!(src.next(), Some(0.0), "Silent frame finishes before new audio");
        assert_eq!(src.next(), Some(0.5));
        assert_eq!(src.next(), Some(-0.5));
    }

    #[test]
    fn test_source_ends_after_finish_and_drain() {
        let ring = Arc::new(RingBuffer::new(64).unwrap());
        let finished = Arc::new(AtomicBool::new(false));
        let mut src = source(&ring, &finished);

        ring.write(&[frame(0.25, 0.75)]);
        finished.store(true, Ordering::Relaxed);
        assert_eq!(src.next(), Some(0.25), "Queued frames still play after finish");
        assert_eq!(src.next(), Some(0.75));
        assert_eq!(src.next(), None);
    }
}
