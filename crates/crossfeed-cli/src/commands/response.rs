//! Coefficient and impulse response inspection.

use super::common::{SettingsArgs, tenths_db};
use clap::Args;
use crossfeed_core::{DELAY_FRAMES, NATIVE_FREQUENCY, Q31, SampleFormat};
use crossfeed_io::{FULL_SCALE, Pipeline, PlanarSamples};

#[derive(Args)]
pub struct ResponseArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Number of response samples to print
    #[arg(short = 'n', long, default_value = "32")]
    samples: usize,

    /// Sample rate the corner frequency is normalized to
    #[arg(long, default_value_t = NATIVE_FREQUENCY)]
    sample_rate: u32,
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    if args.sample_rate == 0 {
        anyhow::bail!("Sample rate must be positive");
    }
    let settings = args.settings.resolve()?.with_enabled(true);

    let mut pipeline = Pipeline::new(SampleFormat::stereo(args.sample_rate));
    settings.apply(pipeline.control())?;
    let coefs = pipeline.control().coefficients();

    println!("Settings @ {} Hz", args.sample_rate);
    println!("  direct gain:  {}", tenths_db(settings.direct_gain));
    println!("  cross gain:   {}", tenths_db(settings.cross_gain));
    println!("  hf gain:      {}", tenths_db(settings.hf_gain()));
    println!("  hf cutoff:    {} Hz", settings.hf_cutoff);
    println!();
    println!("Coefficients (Q31)");
    print_coef("direct", coefs.direct_gain);
    for (i, c) in coefs.filter.iter().enumerate() {
        print_coef(&format!("c{i}"), *c);
    }

    // room for the delay plus the requested tail
    let frames = DELAY_FRAMES + args.samples;
    let mut left = vec![0; frames];
    left[0] = FULL_SCALE;
    let mut samples = PlanarSamples::new(vec![left, vec![0; frames]]);
    pipeline.process_all(&mut samples, frames, |_| {});

    println!();
    println!(
        "Left -> right impulse response (after {} frame delay)",
        DELAY_FRAMES
    );
    println!("  {:>5}  {:>12}  {:>9}", "n", "amplitude", "dB");
    let right = &samples.channels[1][DELAY_FRAMES..];
    for (n, &s) in right.iter().enumerate() {
        let amp = f64::from(s) / f64::from(FULL_SCALE);
        println!("  {:>5}  {:>12.8}  {:>9}", n, amp, db_label(amp));
    }
    println!();
    println!(
        "Left -> left direct: {:.8}",
        f64::from(samples.channels[0][0]) / f64::from(FULL_SCALE)
    );

    Ok(())
}

fn print_coef(name: &str, c: Q31) {
    println!("  {:>6}  {:>12}  {:>12.9}", name, c.to_bits(), c.to_f64());
}

fn db_label(amp: f64) -> String {
    if amp == 0.0 {
        "-inf".to_string()
    } else {
        format!("{:.2}", 20.0 * amp.abs().log10())
    }
}
