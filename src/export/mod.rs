//! Audio export
//!
//! Writes rendered chip output to files:
//! - WAV (16-bit stereo PCM at the chip rate)
//!
//! # Examples
//!
//! ```no_run
//! use vsu::export::write_wav;
//! use vsu::Vsu;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut chip = Vsu::new();
//! let frames = chip.render(41_667);
//! write_wav(&frames, "output.wav")?;
//! # Ok(())
//! # }
//! ```

mod wav;
pub use wav::*;
