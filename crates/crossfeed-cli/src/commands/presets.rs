//! Factory preset listing.

use super::common::{load_preset, tenths_db};
use clap::Args;
use crossfeed_config::{Preset, factory_presets};

#[derive(Args)]
pub struct PresetsArgs {
    /// Show a single preset (factory name or file path)
    name: Option<String>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        let preset = load_preset(name)?;
        show_preset(&preset);
        return Ok(());
    }

    println!("Factory Presets:");
    println!("================");
    for preset in factory_presets() {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:12} - {}", preset.name.to_lowercase(), desc);
        let s = &preset.crossfeed;
        println!(
            "  {:12}   direct {:>8}  cross {:>8}  hf atten {:>8}  corner {:>4} Hz",
            "",
            tenths_db(s.direct_gain),
            tenths_db(s.cross_gain),
            tenths_db(s.hf_attenuation),
            s.hf_cutoff
        );
    }
    println!();
    println!("  Use with: crossfeed process IN.wav OUT.wav --preset <name>");

    Ok(())
}

fn show_preset(preset: &Preset) {
    let s = &preset.crossfeed;
    println!("{}", preset.name);
    if let Some(desc) = &preset.description {
        println!("  {}", desc);
    }
    println!();
    println!("  enabled:         {}", s.enabled);
    println!("  direct gain:     {}", tenths_db(s.direct_gain));
    println!("  cross gain:      {}", tenths_db(s.cross_gain));
    println!("  hf attenuation:  {}", tenths_db(s.hf_attenuation));
    println!("  hf gain:         {}", tenths_db(s.hf_gain()));
    println!("  hf cutoff:       {} Hz", s.hf_cutoff);
}
