//! Buffer-driven chip processor
//!
//! Register writes come from a different thread than the one producing audio.
//! The writer pushes whole (field, value) writes onto a [`RegisterQueue`];
//! the audio side drains the queue once at the start of every buffer, then
//! runs the chip for exactly the buffer's length. A write therefore never
//! lands mid-buffer, let alone mid-cycle.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::vsu::{AudioFrames, RegisterWrite, Vsu};

/// Producer handle for register writes.
///
/// Cheap to clone; every clone feeds the same processor.
#[derive(Debug, Clone, Default)]
pub struct RegisterQueue {
    pending: Arc<Mutex<VecDeque<RegisterWrite>>>,
}

impl RegisterQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one write for the next buffer
    pub fn push(&self, write: RegisterWrite) {
        self.pending.lock().push_back(write);
    }

    /// Queue several writes, kept in order and contiguous
    pub fn extend<I: IntoIterator<Item = RegisterWrite>>(&self, writes: I) {
        self.pending.lock().extend(writes);
    }

    /// Number of writes waiting
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// True if nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Move every waiting write into `out`, oldest first
    fn drain_into(&self, out: &mut Vec<RegisterWrite>) {
        let mut pending = self.pending.lock();
        out.extend(pending.drain(..));
    }
}

/// Owns a chip and advances it one buffer at a time.
#[derive(Debug)]
pub struct VsuProcessor {
    vsu: Vsu,
    queue: RegisterQueue,
    scratch: Vec<RegisterWrite>,
}

impl VsuProcessor {
    /// Create a processor around a fresh chip
    pub fn new() -> Self {
        VsuProcessor {
            vsu: Vsu::new(),
            queue: RegisterQueue::new(),
            scratch: Vec::new(),
        }
    }

    /// Producer handle for this processor
    pub fn queue(&self) -> RegisterQueue {
        self.queue.clone()
    }

    /// Apply all queued writes, then run one chip cycle per frame in `frames`.
    pub fn process(&mut self, frames: &mut AudioFrames) {
        self.queue.drain_into(&mut self.scratch);
        if !self.scratch.is_empty() {
            tracing::trace!(writes = self.scratch.len(), "applying queued register writes");
        }
        for write in self.scratch.drain(..) {
            self.vsu.write(&write);
        }

        self.vsu.cycles(frames);
    }

    /// The chip being driven
    pub fn vsu(&self) -> &Vsu {
        &self.vsu
    }

    /// Mutable access to the chip, for writes between buffers on the audio side
    pub fn vsu_mut(&mut self) -> &mut Vsu {
        &mut self.vsu
    }
}

impl Default for VsuProcessor {
    fn default() -> Self {
        Self::new()
    }
}
