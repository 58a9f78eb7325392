//! Real-time audio output
//!
//! Rendered frames go into a [`RingBuffer`] that a rodio-backed
//! [`AudioDevice`] drains on its own thread.

pub mod audio_device;
pub mod ring_buffer;

pub use audio_device::AudioDevice;
pub use ring_buffer::RingBuffer;

use std::sync::Arc;
use std::time::Duration;

use crate::config::StreamConfig;
use crate::vsu::{AudioFrames, StereoFrame};
use crate::Result;

/// Producer backoff while the ring buffer is full
pub const BUFFER_BACKOFF_MICROS: u64 = 100;

/// Write every frame, sleeping while the ring is full. Returns the count written.
pub fn write_blocking(ring: &RingBuffer, frames: &[StereoFrame]) -> usize {
    let mut remaining = frames;
    while !remaining.is_empty() {
        let written = ring.write(remaining);
        if written == 0 {
            std::thread::sleep(Duration::from_micros(BUFFER_BACKOFF_MICROS));
        } else {
            remaining = &remaining[written..];
        }
    }
    frames.len()
}

/// Play rendered frames on the default output device and wait until done.
pub fn play_frames(frames: &AudioFrames, config: &StreamConfig) -> Result<()> {
    config.validate()?;

    let ring_frames = config.ring_buffer_size / usize::from(config.channels);
    let ring = Arc::new(RingBuffer::new(ring_frames)?);
    let device = AudioDevice::new(config, Arc::clone(&ring))?;
    tracing::info!(
        frames = frames.len(),
        latency_ms = config.latency_ms(),
        "streaming to audio device"
    );

    let mut chunk = Vec::with_capacity(config.buffer_frames);
    for frame in frames.iter() {
        chunk.push(frame);
        if chunk.len() == config.buffer_frames {
            write_blocking(&ring, &chunk);
            chunk.clear();
        }
    }
    write_blocking(&ring, &chunk);

    device.finish();
    device.wait_for_finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_write_blocking_waits_for_consumer() {
        let ring = Arc::new(RingBuffer::new(16).unwrap());
        let consumer_ring = Arc::clone(&ring);

        let consumer = thread::spawn(move || {
            let mut received = Vec::new();
            let mut dest = [StereoFrame::default(); 8];
            while received.len() < 100 {
                let count = consumer_ring.read(&mut dest);
                received.extend_from_slice(&dest[..count]);
                thread::yield_now();
            }
            received
        });

        let frames: Vec<StereoFrame> = (0..100)
            .map(|i| StereoFrame {
                left: i as f32,
                right: -(i as f32),
            })
            .collect();
        assert_eq!(write_blocking(&ring, &frames), 100);
        assert_eq!(consumer.join().unwrap(), frames, "Frames arrive whole and in order");
    }
}
