//! Shared CLI helpers used across multiple commands.

use clap::Args;
use crossfeed_config::{ConfigError, CrossfeedSettings, Preset, get_factory_preset};
use std::path::{Path, PathBuf};

/// Where crossfeed settings come from, plus per-field overrides.
///
/// Values are in tenths of a dB (`-15` is -1.5 dB) and Hz.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Factory preset name or path to a preset file
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    /// Settings file (TOML, top-level keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Direct path gain in tenths of a dB
    #[arg(long, allow_negative_numbers = true)]
    direct_gain: Option<i32>,

    /// Cross path gain below the corner, in tenths of a dB
    #[arg(long, allow_negative_numbers = true)]
    cross_gain: Option<i32>,

    /// Extra cross path attenuation above the corner, in tenths of a dB
    #[arg(long, allow_negative_numbers = true)]
    hf_attenuation: Option<i32>,

    /// Corner frequency in Hz
    #[arg(long)]
    hf_cutoff: Option<u32>,
}

impl SettingsArgs {
    /// Resolve the base settings and apply overrides. The result is validated.
    pub fn resolve(&self) -> anyhow::Result<CrossfeedSettings> {
        let mut settings = if let Some(name) = &self.preset {
            let preset = load_preset(name)?;
            tracing::info!(preset = %preset.name, "using preset");
            preset.crossfeed
        } else if let Some(path) = &self.config {
            tracing::info!(path = %path.display(), "using settings file");
            CrossfeedSettings::load(path)?
        } else {
            CrossfeedSettings::default()
        };

        if let Some(v) = self.direct_gain {
            settings = settings.with_direct_gain(v);
        }
        if let Some(v) = self.cross_gain {
            settings = settings.with_cross_gain(v);
        }
        if let Some(v) = self.hf_attenuation {
            settings = settings.with_hf_attenuation(v);
        }
        if let Some(v) = self.hf_cutoff {
            settings = settings.with_hf_cutoff(v);
        }

        settings.validate().map_err(ConfigError::from)?;
        Ok(settings)
    }
}

/// Load a preset by factory name, falling back to a file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        return Ok(Preset::load(path)?);
    }

    Err(ConfigError::PresetNotFound(name.to_string()).into())
}

/// Format tenths of a dB for display.
pub fn tenths_db(tenths: i32) -> String {
    format!("{:.1} dB", f64::from(tenths) / 10.0)
}
