//! Kinema CLI - headless simulation of kinema interactables and timings.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kinema")]
#[command(author, version, about = "Kinema animation graph CLI", long_about = None)]
struct Cli {
    /// Raise the log level (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drag a preset's interactable along a scripted gesture and print each frame
    Simulate(commands::simulate::SimulateArgs),

    /// Run an eased timing animation and print each frame
    Timing(commands::timing::TimingArgs),

    /// List, show and copy presets
    Presets(commands::presets::PresetsArgs),

    /// Validate a preset file
    Validate(commands::validate::ValidateArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Timing(args) => commands::timing::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Validate(args) => commands::validate::run(args),
    }
}
