//! Frame queue between the render thread and the audio device
//!
//! The render side pushes whole [`StereoFrame`]s and the device callback pops
//! them, so a reader can never observe half a frame. Storage is allocated
//! once; a full ring refuses frames instead of growing.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::vsu::StereoFrame;
use crate::{Result, VsuError};

/// Largest allowed allocation: 512 MB worth of frames
const MAX_FRAMES: usize = 512 * 1024 * 1024 / std::mem::size_of::<StereoFrame>();

/// Bounded single-producer/single-consumer frame ring
#[derive(Debug)]
pub struct RingBuffer {
    frames: Mutex<VecDeque<StereoFrame>>,
    capacity: usize,
}

impl RingBuffer {
    /// Create a ring holding up to `capacity` frames.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(VsuError::ConfigError(
                "Ring buffer must hold at least one frame".into(),
            ));
        }
        if capacity > MAX_FRAMES {
            return Err(VsuError::ConfigError(format!(
                "Ring buffer of {capacity} frames exceeds maximum of {MAX_FRAMES}"
            )));
        }

        Ok(RingBuffer {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// Frames waiting to be read
    pub fn available_read(&self) -> usize {
        self.frames.lock().len()
    }

    /// Frames that can be written before the ring is full
    pub fn available_write(&self) -> usize {
        self.capacity - self.frames.lock().len()
    }

    /// Push as many frames as fit; returns the count written
    pub fn write(&self, frames: &[StereoFrame]) -> usize {
        let mut queue = self.frames.lock();
        let count = frames.len().min(self.capacity - queue.len());
        queue.extend(&frames[..count]);
        count
    }

    /// Pop up to `dest.len()` frames, oldest first; returns the count read
    pub fn read(&self, dest: &mut [StereoFrame]) -> usize {
        let mut queue = self.frames.lock();
        let count = dest.len().min(queue.len());
        for (slot, frame) in dest.iter_mut().zip(queue.drain(..count)) {
            *slot = frame;
        }
        count
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.available_read() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(left: f32, right: f32) -> StereoFrame {
        StereoFrame { left, right }
    }

    #[test]
    fn test_new_ring_is_empty() {
        let rb = RingBuffer::new(1000).unwrap();
        assert_eq!(rb.capacity(), 1000);
        assert!(rb.is_empty());
        assert_eq!(rb.available_write(), 1000);
    }

    #[test]
    fn test_frames_read_back_in_order() {
        let rb = RingBuffer::new(16).unwrap();
        let frames: Vec<StereoFrame> = (0..12).map(|i| frame(i as f32, -(i as f32))).collect();
        assert_eq!(rb.write(&frames[..8]), 8);

        let mut dest = vec![StereoFrame::default(); 5];
        assert_eq!(rb.read(&mut dest), 5);
        assert_eq!(dest, frames[..5]);

        assert_eq!(rb.write(&frames[8..]), 4);
        let mut rest = vec![StereoFrame::default(); 16];
        assert_eq!(rb.read(&mut rest), 7);
        assert_eq!(rest[..7], frames[5..]);
        assert!(rb.is_empty());
    }

    #[test]
    fn test_full_ring_rejects_frames() {
        let rb = RingBuffer::new(8).unwrap();
        assert_eq!(rb.write(&[frame(1.0, 1.0); 20]), 8);
        assert_eq!(rb.write(&[frame(1.0, 1.0)]), 0);
        assert_eq!(rb.available_write(), 0);
    }

    #[test]
    fn test_zero_capacity_error() {
        let err = RingBuffer::new(0).unwrap_err();
        assert!(err.to_string().contains("at least one frame"));
    }

    #[test]
    fn test_max_capacity_exceeded() {
        let err = RingBuffer::new(MAX_FRAMES + 1).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }
}
