//! Named, described settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::settings::CrossfeedSettings;

/// A named set of crossfeed settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Strong"
/// description = "Close to a near-field speaker pair"
///
/// [crossfeed]
/// direct_gain = -30
/// cross_gain = -30
/// hf_attenuation = -200
/// hf_cutoff = 600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    /// Name of the preset.
    #[serde(default = "default_name")]
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The settings themselves.
    #[serde(default)]
    pub crossfeed: CrossfeedSettings,
}

fn default_name() -> String {
    "Custom".to_string()
}

impl Preset {
    /// Preset with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            crossfeed: CrossfeedSettings::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the settings.
    pub fn with_settings(mut self, settings: CrossfeedSettings) -> Self {
        self.crossfeed = settings;
        self
    }

    /// Load a preset from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let preset: Preset = toml::from_str(toml_str)?;
        preset.crossfeed.validate()?;
        Ok(preset)
    }
}
