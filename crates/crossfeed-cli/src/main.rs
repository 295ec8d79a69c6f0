//! Crossfeed CLI - headphone crossfeed for WAV files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crossfeed")]
#[command(author, version, about = "Headphone crossfeed CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply crossfeed to a WAV file
    Process(commands::process::ProcessArgs),

    /// List factory presets and their values
    Presets(commands::presets::PresetsArgs),

    /// Print the coefficients and impulse response of a setting
    Response(commands::response::ResponseArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Response(args) => commands::response::run(args),
    }
}
