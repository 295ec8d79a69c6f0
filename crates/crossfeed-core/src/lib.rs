//! Crossfeed Core - fixed-point headphone crossfeed
//!
//! On headphones each ear hears only its own channel. Crossfeed restores a
//! little of what loudspeakers do naturally: every channel also reaches the far
//! ear, slightly later and with the highs rolled off. This crate implements
//! that as a pipeline stage running entirely in integer arithmetic, with no
//! allocation on the audio path.
//!
//! # Signal Path
//!
//! ```text
//!  in_L ──┬──── × direct_gain ─────────────(+)──▶ out_L
//!         │                                 ▲
//!         └─▶ delay 13 ─▶ shelf ─┐          │
//!                                 ╳ ────────┘
//!         ┌─▶ delay 13 ─▶ shelf ─┘          │
//!         │                                 ▼
//!  in_R ──┴──── × direct_gain ─────────────(+)──▶ out_R
//! ```
//!
//! # Modules
//!
//! - [`fixed`] - [`Q31`] and the fixed-point primitives
//! - [`gain`] - dB to linear gain
//! - [`shelf`] - first-order shelf design
//! - [`coefs`] - user parameters to [`Coefficients`]
//! - [`delay`] - [`DelayLineState`]
//! - [`processor`] - the per-sample loop behind [`SampleProcessor`]
//! - [`params`] - [`SharedCoefficients`], tear-free publication across threads
//! - [`control`] - [`CrossfeedControl`], the user-facing setters
//! - [`stage`] - [`CrossfeedStage`] and the [`Host`] contract
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use crossfeed_core::{
//!     CrossfeedStage, DspBuffer, Host, PipelineId, SampleFormat, SharedCoefficients,
//!     StageEvent, StageId,
//! };
//!
//! struct NullHost;
//! impl Host for NullHost {
//!     fn pipeline_id(&self) -> PipelineId { PipelineId(0) }
//!     fn activate(&mut self, _: StageId, _: bool) {}
//!     fn enable(&mut self, _: StageId, _: bool) {}
//! }
//!
//! let mut stage = CrossfeedStage::new(Arc::new(SharedCoefficients::default()));
//! let control = stage.control();
//! control.set_direct_gain(-15);
//! control.set_cross_params(-60, -220, 700);
//!
//! let mut host = NullHost;
//! stage.configure(&mut host, StageEvent::Init);
//!
//! let mut left = vec![0i32; 256];
//! let mut right = vec![0i32; 256];
//! let mut channels: [&mut [i32]; 2] = [&mut left, &mut right];
//! let mut buf = DspBuffer::new(SampleFormat::stereo(44_100), &mut channels);
//! stage.process(&mut host, &mut buf);
//! assert!(stage.is_active());
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature. The crate then needs `alloc` for the
//! shared coefficient cell:
//!
//! ```toml
//! [dependencies]
//! crossfeed-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to get `debug!` events on stage transitions
//! and parameter changes. Nothing is logged from the per-sample loop.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod coefs;
pub mod control;
pub mod delay;
pub mod fixed;
pub mod gain;
pub mod params;
pub mod processor;
pub mod shelf;
pub mod stage;

pub use coefs::{Coefficients, NATIVE_FREQUENCY, cross_filter, direct_gain_from_db};
pub use control::CrossfeedControl;
pub use delay::{DELAY_FRAMES, DELAY_LEN, DelayLineState};
pub use fixed::{Q31, fp_div, frac_mul, frac_mul_shl};
pub use gain::linear_gain_q24;
pub use params::SharedCoefficients;
pub use processor::{ReferenceProcessor, SampleProcessor, SpanProcessor};
pub use shelf::{ShelfKind, shelf_coefs};
pub use stage::{
    CrossfeedStage, DspBuffer, Host, PipelineId, SampleFormat, StageEvent, StageId, StageState,
};
