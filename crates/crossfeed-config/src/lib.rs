//! Settings and presets for the crossfeed stage.
//!
//! Crossfeed is configured with four numbers in user units (tenths of a dB
//! and Hz) plus an on/off switch. This crate loads them from TOML, checks them
//! against the ranges the core relies on, and pushes them to a
//! [`CrossfeedControl`](crossfeed_core::CrossfeedControl).
//!
//! Settings are read, never written back.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use crossfeed_config::{CrossfeedSettings, get_factory_preset};
//! use crossfeed_core::{CrossfeedControl, SharedCoefficients};
//!
//! let control = CrossfeedControl::new(Arc::new(SharedCoefficients::default()));
//!
//! let settings = CrossfeedSettings::from_toml("hf_cutoff = 900").unwrap();
//! settings.apply(&control).unwrap();
//!
//! let strong = get_factory_preset("strong").unwrap();
//! strong.crossfeed.apply(&control).unwrap();
//! ```

mod error;
mod preset;
mod settings;

/// Range checks.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use preset::Preset;
pub use settings::CrossfeedSettings;
pub use validation::{ValidationError, ValidationResult};
