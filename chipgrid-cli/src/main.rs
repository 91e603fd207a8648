//! Chipgrid CLI - generate chip grids and prepare classification datasets.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chipgrid",
    version,
    about = "Deterministic AOI chip-grid generation for mining-disturbance datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the chip grid for an AOI and write it as GeoJSON.
    Grid(commands::grid::GridArgs),
    /// Split a labeled chip-image directory into train/test sets.
    Split(commands::split::SplitArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Grid(args) => commands::grid::run(args),
        Commands::Split(args) => commands::split::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
