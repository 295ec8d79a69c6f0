//! User-facing crossfeed settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crossfeed_core::{Coefficients, CrossfeedControl, cross_filter, direct_gain_from_db};

use crate::error::ConfigError;
use crate::validation::{
    CROSS_GAIN_RANGE, DIRECT_GAIN_RANGE, HF_ATTENUATION_RANGE, HF_CUTOFF_RANGE,
    ValidationResult, check_range, collect,
};

/// Crossfeed settings in the units a user sees: tenths of a dB and Hz.
///
/// Missing fields take their defaults, so a file only needs to name what it
/// changes.
///
/// # TOML Format
///
/// ```toml
/// enabled = true
/// direct_gain = -15      # -1.5 dB
/// cross_gain = -60       # -6.0 dB
/// hf_attenuation = -160  # a further -16.0 dB above the corner
/// hf_cutoff = 700        # Hz
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CrossfeedSettings {
    /// Whether crossfeed is wanted at all.
    pub enabled: bool,
    /// Gain of the un-delayed signal.
    pub direct_gain: i32,
    /// Gain of the cross path below the corner.
    pub cross_gain: i32,
    /// Additional cross-path attenuation above the corner.
    pub hf_attenuation: i32,
    /// Corner frequency of the cross-path shelf.
    pub hf_cutoff: u32,
}

impl Default for CrossfeedSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            direct_gain: -15,
            cross_gain: -60,
            hf_attenuation: -160,
            hf_cutoff: 700,
        }
    }
}

impl CrossfeedSettings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Set the direct gain.
    pub fn with_direct_gain(mut self, tenths_db: i32) -> Self {
        self.direct_gain = tenths_db;
        self
    }

    /// Set the cross gain.
    pub fn with_cross_gain(mut self, tenths_db: i32) -> Self {
        self.cross_gain = tenths_db;
        self
    }

    /// Set the high-frequency attenuation.
    pub fn with_hf_attenuation(mut self, tenths_db: i32) -> Self {
        self.hf_attenuation = tenths_db;
        self
    }

    /// Set the corner frequency.
    pub fn with_hf_cutoff(mut self, hz: u32) -> Self {
        self.hf_cutoff = hz;
        self
    }

    /// Set whether crossfeed is wanted.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> ValidationResult<()> {
        collect([
            check_range("direct_gain", self.direct_gain, &DIRECT_GAIN_RANGE),
            check_range("cross_gain", self.cross_gain, &CROSS_GAIN_RANGE),
            check_range("hf_attenuation", self.hf_attenuation, &HF_ATTENUATION_RANGE),
            check_range("hf_cutoff", self.hf_cutoff, &HF_CUTOFF_RANGE),
        ])
    }

    /// Cross-path gain above the corner: cross gain plus attenuation.
    pub fn hf_gain(&self) -> i32 {
        self.cross_gain.saturating_add(self.hf_attenuation)
    }

    /// Coefficients these settings translate to for a pipeline running at
    /// `native_frequency` Hz, the same set [`apply`](Self::apply) publishes
    /// through a control at that rate.
    pub fn coefficients(&self, native_frequency: u32) -> Coefficients {
        Coefficients {
            direct_gain: direct_gain_from_db(self.direct_gain),
            filter: cross_filter(
                self.cross_gain,
                self.hf_gain(),
                self.hf_cutoff,
                native_frequency,
            ),
        }
    }

    /// Validate, then push everything to `control`.
    pub fn apply(&self, control: &CrossfeedControl) -> Result<(), ConfigError> {
        self.validate()?;
        control.set_direct_gain(self.direct_gain);
        control.set_cross_params(self.cross_gain, self.hf_gain(), self.hf_cutoff);
        control.enable_crossfeed(self.enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use crossfeed_core::{NATIVE_FREQUENCY, SharedCoefficients};
    use std::sync::Arc;

    #[test]
    fn defaults_are_valid() {
        let s = CrossfeedSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.hf_gain(), -220);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = CrossfeedSettings::from_toml("hf_cutoff = 1000").unwrap();
        assert_eq!(s.hf_cutoff, 1000);
        assert_eq!(s.direct_gain, CrossfeedSettings::default().direct_gain);
        assert!(s.enabled);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            CrossfeedSettings::from_toml("").unwrap(),
            CrossfeedSettings::default()
        );
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = CrossfeedSettings::from_toml("hf_cutoff = \"high\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn positive_cross_gain_is_rejected() {
        let s = CrossfeedSettings::default().with_cross_gain(10);
        assert!(matches!(
            s.validate(),
            Err(ValidationError::OutOfRange {
                param: "cross_gain",
                ..
            })
        ));
    }

    #[test]
    fn several_bad_fields_are_all_reported() {
        let s = CrossfeedSettings::default()
            .with_direct_gain(30)
            .with_hf_attenuation(0)
            .with_hf_cutoff(20_000);
        let Err(ValidationError::Multiple(errors)) = s.validate() else {
            panic!("expected Multiple");
        };
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn coefficients_follow_the_control_rate() {
        let s = CrossfeedSettings::default();
        let shared = Arc::new(SharedCoefficients::default());
        let control = CrossfeedControl::with_native_frequency(shared, 48_000);
        s.apply(&control).unwrap();
        assert_eq!(control.coefficients(), s.coefficients(48_000));
        assert_ne!(s.coefficients(48_000), s.coefficients(NATIVE_FREQUENCY));
        assert_eq!(
            s.coefficients(NATIVE_FREQUENCY),
            Coefficients::from_db(-15, -60, -220, 700)
        );
    }

    #[test]
    fn apply_publishes_coefficients_and_enable() {
        let control = CrossfeedControl::new(Arc::new(SharedCoefficients::default()));
        let s = CrossfeedSettings::default();
        s.apply(&control).unwrap();
        assert_eq!(control.coefficients(), s.coefficients(NATIVE_FREQUENCY));
        assert!(control.is_enabled());
    }

    #[test]
    fn apply_rejects_invalid_without_touching_control() {
        let control = CrossfeedControl::new(Arc::new(SharedCoefficients::default()));
        let s = CrossfeedSettings::default().with_direct_gain(60);
        assert!(matches!(s.apply(&control), Err(ConfigError::Validation(_))));
        assert_eq!(control.coefficients(), Coefficients::SILENT);
        assert!(!control.is_enabled());
    }
}
