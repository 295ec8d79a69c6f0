//! File-based crossfeed processing command.

use super::common::{SettingsArgs, tenths_db};
use clap::Args;
use crossfeed_core::SampleFormat;
use crossfeed_io::{FULL_SCALE, Pipeline, PlanarSamples, WavFormat, WavSpec, read_wav, write_wav};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Processing block size in frames
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (8 to 32, integer PCM). Defaults to the input's encoding.
    #[arg(long)]
    bit_depth: Option<u16>,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?;

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav(&args.input)?;
    let frames = samples.frames();
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate)
    );

    if args.block_size == 0 {
        anyhow::bail!("Block size must be at least 1");
    }

    let format = SampleFormat {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    };
    let mut pipeline = Pipeline::new(format);
    settings.apply(pipeline.control())?;

    if spec.channels < 2 {
        println!("Input is mono; crossfeed will pass it through unchanged.");
    } else if !settings.enabled {
        println!("Crossfeed disabled by settings; copying audio unchanged.");
    } else {
        println!(
            "Crossfeed: direct {}, cross {}, HF {}, corner {} Hz",
            tenths_db(settings.direct_gain),
            tenths_db(settings.cross_gain),
            tenths_db(settings.hf_gain()),
            settings.hf_cutoff
        );
    }
    tracing::info!(
        block_size = args.block_size,
        frames,
        sample_rate = spec.sample_rate,
        "processing"
    );

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let input_peak = peak_db(&samples);
    pipeline.process_all(&mut samples, args.block_size, |n| pb.inc(n as u64));
    pb.finish_with_message("done");

    println!("\nStats:");
    println!("  Input:  Peak {:.1} dBFS", input_peak);
    println!("  Output: Peak {:.1} dBFS", peak_db(&samples));

    let out_spec = match args.bit_depth {
        Some(bits) => WavSpec {
            bits_per_sample: bits,
            format: WavFormat::Pcm,
            ..spec
        },
        None => spec,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &samples, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Peak level across all channels in dB relative to full scale.
fn peak_db(samples: &PlanarSamples) -> f64 {
    let peak = samples
        .channels
        .iter()
        .flatten()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0);
    if peak == 0 {
        -120.0
    } else {
        20.0 * (f64::from(peak) / f64::from(FULL_SCALE)).log10()
    }
}
