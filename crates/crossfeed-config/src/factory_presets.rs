//! Factory presets bundled with the library.
//!
//! Embedded at compile time as TOML so they go through exactly the same
//! parsing and validation as user files.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "light", "moderate", "strong"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("light", LIGHT_PRESET),
    ("moderate", MODERATE_PRESET),
    ("strong", STRONG_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Stock settings - gentle blend with a 700 Hz corner"

[crossfeed]
direct_gain = -15
cross_gain = -60
hf_attenuation = -160
hf_cutoff = 700
"#;

const LIGHT_PRESET: &str = r#"
name = "Light"
description = "Barely there - takes the edge off hard-panned mixes"

[crossfeed]
direct_gain = -5
cross_gain = -90
hf_attenuation = -120
hf_cutoff = 700
"#;

const MODERATE_PRESET: &str = r#"
name = "Moderate"
description = "More bleed with a higher corner - good for older stereo recordings"

[crossfeed]
direct_gain = -20
cross_gain = -45
hf_attenuation = -160
hf_cutoff = 900
"#;

const STRONG_PRESET: &str = r#"
name = "Strong"
description = "Close to a near-field speaker pair"

[crossfeed]
direct_gain = -30
cross_gain = -30
hf_attenuation = -200
hf_cutoff = 600
"#;

/// All factory presets, in [`FACTORY_PRESET_NAMES`] order.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use crossfeed_config::get_factory_preset;
///
/// let preset = get_factory_preset("Strong").unwrap();
/// assert_eq!(preset.crossfeed.hf_cutoff, 600);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .and_then(|(_, toml)| Preset::from_toml(toml).ok())
}

/// Names of all factory presets.
pub fn factory_preset_names() -> &'static [&'static str] {
    FACTORY_PRESET_NAMES
}

/// Whether `name` is a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    FACTORY_PRESET_NAMES
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrossfeedSettings;

    #[test]
    fn all_factory_presets_parse_and_validate() {
        for (name, toml) in FACTORY_PRESETS_TOML {
            let preset = Preset::from_toml(toml);
            assert!(preset.is_ok(), "factory preset '{name}' failed: {preset:?}");
        }
        assert_eq!(factory_presets().len(), FACTORY_PRESET_NAMES.len());
    }

    #[test]
    fn names_match_table() {
        let table: Vec<_> = FACTORY_PRESETS_TOML.iter().map(|(n, _)| *n).collect();
        assert_eq!(table, FACTORY_PRESET_NAMES);
    }

    #[test]
    fn default_preset_matches_default_settings() {
        let preset = get_factory_preset("default").unwrap();
        assert_eq!(preset.crossfeed, CrossfeedSettings::default());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(get_factory_preset("MODERATE").is_some());
        assert!(is_factory_preset("Light"));
        assert!(get_factory_preset("nonexistent").is_none());
        assert!(!is_factory_preset("nonexistent"));
    }

    #[test]
    fn presets_get_progressively_stronger() {
        let cross: Vec<i32> = ["light", "default", "moderate", "strong"]
            .iter()
            .map(|n| get_factory_preset(n).unwrap().crossfeed.cross_gain)
            .collect();
        assert!(cross.windows(2).all(|w| w[0] < w[1]), "{cross:?}");
    }
}
