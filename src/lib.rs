//! Virtual Boy VSU Emulator
//!
//! A cycle-accurate emulator of the Virtual Boy's six-channel sound unit.
//! Register writes from a host go in; stereo frames at the chip's native
//! 41 667 Hz come out, one per chip cycle.
//!
//! # Features
//! - Four wavetable channels, one sweep/modulation channel, one noise channel
//! - Envelope generators and one-shot duration timers on every channel
//! - Bit-exact mixer quantization
//! - Register writes by field or by packed hardware register byte
//! - Single-writer/single-reader register queue for real-time use
//! - JSON register scripts, WAV export and optional device playback
//!
//! # Crate feature flags
//! - `emulator` (default): queued processor and stream configuration
//! - `script` (default): JSON register scripts (`script`)
//! - `export-wav` (default): WAV export (enables `hound`)
//! - `streaming` (opt-in): real-time audio output (enables `rodio`)
//!
//! # Quick start
//! ```no_run
//! use vsu::vsu::{ChannelId, Field, RegisterWrite, Vsu};
//!
//! let mut chip = Vsu::new();
//! chip.set_waveform_data(0, &[64; 32]);
//! chip.write(&RegisterWrite::scalar(Field::EnvelopeLevel(ChannelId::Ch1), 15));
//! chip.write(&RegisterWrite::scalar(Field::Frequency(ChannelId::Ch1), 1500));
//! chip.write(&RegisterWrite::flag(Field::Enabled(ChannelId::Ch1), true));
//! let frames = chip.render(41_667);
//! assert_eq!(frames.len(), 41_667);
//! ```
//!
//! ## Real-time style processing
//! ```no_run
//! # #[cfg(feature = "emulator")]
//! # {
//! use vsu::vsu::{AudioFrames, ChannelId, Field, RegisterWrite};
//! use vsu::VsuProcessor;
//!
//! let mut processor = VsuProcessor::new();
//! let queue = processor.queue();
//! std::thread::spawn(move || {
//!     queue.push(RegisterWrite::flag(Field::Enabled(ChannelId::Ch6), true));
//! });
//! let mut buffer = AudioFrames::new(128);
//! processor.process(&mut buffer);
//! # }
//! ```

#![warn(missing_docs)]

// Domain modules (feature-gated for modular use)
pub mod vsu; // VSU emulation (core)

#[cfg(feature = "emulator")]
pub mod config; // Stream configuration
#[cfg(feature = "export-wav")]
pub mod export; // WAV export
#[cfg(feature = "emulator")]
pub mod processor; // Register queue and buffer driver
#[cfg(feature = "script")]
pub mod script; // JSON register scripts
#[cfg(feature = "streaming")]
pub mod streaming; // Audio output

/// Error types for VSU emulator operations
#[derive(thiserror::Error, Debug)]
pub enum VsuError {
    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed register script
    #[error("Script error: {0}")]
    Script(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for VsuError {
    /// Converts a String into `VsuError::Other`.
    ///
    /// Prefer the specific variants where the failure kind is known.
    fn from(msg: String) -> Self {
        VsuError::Other(msg)
    }
}

impl From<&str> for VsuError {
    /// Converts a string slice into `VsuError::Other`.
    fn from(msg: &str) -> Self {
        VsuError::Other(msg.to_string())
    }
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, VsuError>;

// Public API exports
pub use vsu::{AudioFrames, ChannelId, Field, FieldValue, PackedRegister, RegisterWrite, Vsu};

#[cfg(feature = "emulator")]
pub use config::StreamConfig;
#[cfg(feature = "export-wav")]
pub use export::write_wav;
#[cfg(feature = "emulator")]
pub use processor::{RegisterQueue, VsuProcessor};
#[cfg(feature = "script")]
pub use script::{RegisterScript, ScriptEvent};
#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, RingBuffer};
