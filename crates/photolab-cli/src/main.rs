mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photolab", about = "Sensor image and photometer calibration toolkit")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image file metadata
    Info(commands::info::InfoArgs),
    /// Per-channel statistics of one image
    Stats(commands::stats::StatsArgs),
    /// Image pair statistics with fixed pattern noise removed
    Pair(commands::pair::PairArgs),
    /// Stream readings from a photometer
    Poll(commands::poll::PollArgs),
    /// Run a SQL query against a calibration database
    Query(commands::query::QueryArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Pair(args) => commands::pair::run(args),
        Commands::Poll(args) => commands::poll::run(args),
        Commands::Query(args) => commands::query::run(args),
    }
}
