//! Audio I/O for the crossfeed stage.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] convert between files and
//!   planar `i32` samples with [`SAMPLE_FRAC_BITS`] fractional bits
//! - **Offline hosting**: [`Pipeline`] runs a crossfeed stage over buffers the
//!   way a player's DSP chain would, lifecycle events included
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crossfeed_core::SampleFormat;
//! use crossfeed_io::{Pipeline, read_wav, write_wav};
//!
//! let (mut samples, spec) = read_wav("input.wav")?;
//!
//! let format = SampleFormat {
//!     channels: spec.channels,
//!     sample_rate: spec.sample_rate,
//! };
//! let mut pipeline = Pipeline::new(format);
//! pipeline.control().set_direct_gain(-15);
//! pipeline.control().set_cross_params(-60, -220, 700);
//! pipeline.control().enable_crossfeed(true);
//! pipeline.process_all(&mut samples, 1024, |_| {});
//!
//! write_wav("output.wav", &samples, spec)?;
//! # Ok::<(), crossfeed_io::Error>(())
//! ```

mod pipeline;
mod sample;
mod wav;

pub use pipeline::Pipeline;
pub use sample::{
    FULL_SCALE, SAMPLE_FRAC_BITS, fixed_to_float, fixed_to_pcm, float_to_fixed, pcm_to_fixed,
};
pub use wav::{PlanarSamples, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
