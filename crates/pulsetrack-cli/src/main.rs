use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pulsetrack-cli", version, about = "Pulsetrack CLI")]
struct Cli {
    /// Log at debug level (overridden by PULSETRACK_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new interval now
    Begin,
    /// End the interval in progress (under one second is discarded)
    End,
    /// Remove every recorded interval
    Clear,
    /// Set the intensity level (1-10) for the next interval
    Intensity {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        level: u8,
    },
    /// Print the current timeline, streak and badges
    Status(commands::status::StatusArgs),
    /// Recompute and print a frame on every tick
    Watch(commands::status::WatchArgs),
    /// Session statistics
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PULSETRACK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let result = match cli.command {
        Commands::Begin => commands::session::begin(),
        Commands::End => commands::session::end(),
        Commands::Clear => commands::session::clear(),
        Commands::Intensity { level } => commands::session::intensity(level),
        Commands::Status(args) => commands::status::status(args),
        Commands::Watch(args) => commands::status::watch(args),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
