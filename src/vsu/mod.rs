//! VSU Emulation Domain
//!
//! The Virtual Boy's six-channel sound unit: four wavetable channels, one
//! wavetable channel with a sweep/modulation unit and one noise channel,
//! mixed to stereo once per chip cycle.
//!
//! Implementation:
//! - `chip` - the `Vsu` aggregate and its per-cycle clock
//! - `registers` - writable fields and packed hardware register decoding

// Internal modules
pub mod channel;
pub mod chip;
pub mod constants;
pub mod envelope;
pub mod interval;
pub mod mixer;
pub mod noise;
pub mod registers;
pub mod standard;
pub mod sweep_mod;

// Re-export public API
pub use channel::{Channel, ChannelCore, StereoLevel, WaveTables};
pub use chip::Vsu;
pub use mixer::{AudioFrames, StereoFrame};
pub use registers::{ChannelId, Field, FieldValue, PackedRegister, RegisterWrite};
pub use sweep_mod::{ModTable, SweepModFunction};
