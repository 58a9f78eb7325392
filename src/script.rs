//! JSON register scripts
//!
//! A script is a timed list of register writes using the transport's wire
//! names:
//!
//! ```json
//! {
//!   "cycles": 41667,
//!   "events": [
//!     { "cycle": 0, "field": "waveform1", "data": [64, 60, 50] },
//!     { "cycle": 0, "field": "ch1StereoLevels", "data": { "left": 15, "right": 15 } },
//!     { "cycle": 0, "field": "ch1Enabled", "data": 1 }
//!   ]
//! }
//! ```
//!
//! Rendering feeds the events through a [`VsuProcessor`] exactly as a
//! real-time transport would, so writes take effect at buffer boundaries.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::StreamConfig;
use crate::processor::VsuProcessor;
use crate::vsu::{AudioFrames, Field, FieldValue, RegisterWrite};
use crate::{Result, VsuError};

/// One timed write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Chip cycle the write is due at
    pub cycle: usize,
    /// Wire name of the field
    pub field: String,
    /// Payload
    pub data: FieldValue,
}

/// A timed register-write script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterScript {
    /// Total chip cycles (output frames) to render
    pub cycles: usize,
    /// Writes, in any order
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl RegisterScript {
    /// Parse a script from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VsuError::Script(e.to_string()))
    }

    /// Read and parse a script file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Resolve wire names, dropping unknown ones, sorted by cycle.
    ///
    /// Events sharing a cycle keep their script order.
    pub fn writes(&self) -> Vec<(usize, RegisterWrite)> {
        let mut writes: Vec<(usize, RegisterWrite)> = self
            .events
            .iter()
            .filter_map(|event| match Field::from_name(&event.field) {
                Some(field) => Some((event.cycle, RegisterWrite::new(field, event.data.clone()))),
                None => {
                    tracing::debug!(field = %event.field, cycle = event.cycle, "skipping unknown field");
                    None
                }
            })
            .collect();
        writes.sort_by_key(|(cycle, _)| *cycle);
        writes
    }

    /// Render the script to exactly `cycles` frames.
    ///
    /// The span is produced in buffers of `config.buffer_frames`; every event
    /// due before the end of a buffer is applied at that buffer's start.
    pub fn render(&self, config: &StreamConfig) -> Result<AudioFrames> {
        config.validate()?;

        let writes = self.writes();
        tracing::debug!(
            cycles = self.cycles,
            writes = writes.len(),
            buffer_frames = config.buffer_frames,
            "rendering register script"
        );

        let mut processor = VsuProcessor::new();
        let queue = processor.queue();
        let mut pending = writes.into_iter().peekable();

        let mut output = AudioFrames::default();
        let mut buffer = AudioFrames::new(0);
        let mut start = 0;

        while start < self.cycles {
            let len = config.buffer_frames.min(self.cycles - start);
            let end = start + len;

            while let Some((_, write)) = pending.next_if(|(cycle, _)| *cycle < end) {
                queue.push(write);
            }

            buffer.resize(len);
            processor.process(&mut buffer);
            output.extend_from(&buffer);
            start = end;
        }

        Ok(output)
    }
}
