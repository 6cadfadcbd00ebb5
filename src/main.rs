//! Rampart CLI - run, batch and watch castle-defense matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Rampart - A deterministic castle-defense battle simulator
#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single headless match with the player side on autopilot
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// AI difficulty
        #[arg(short, long, default_value = "normal")]
        difficulty: cli::DifficultyArg,

        /// Tier driving the player side
        #[arg(short, long, default_value = "normal")]
        autopilot: cli::DifficultyArg,

        /// Match length in seconds (default: from config)
        #[arg(short = 't', long)]
        time_limit: Option<f64>,

        /// Simulation steps per second
        #[arg(long, default_value = "60")]
        tick_rate: u32,

        /// JSON match config (default: built-in)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print every match event
        #[arg(short, long)]
        events: bool,
    },

    /// Run many matches in parallel and aggregate statistics
    Batch {
        /// Number of matches to run (default: 1000)
        #[arg(short = 'n', long, default_value = "1000")]
        matches: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// AI difficulty
        #[arg(short, long, default_value = "normal")]
        difficulty: cli::DifficultyArg,

        /// Tier driving the player side
        #[arg(short, long, default_value = "normal")]
        autopilot: cli::DifficultyArg,

        /// Match length in seconds (default: from config)
        #[arg(short = 't', long)]
        time_limit: Option<f64>,

        /// JSON match config (default: built-in)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Interactive TUI: play the player side with card keys
    Watch {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// AI difficulty
        #[arg(short, long, default_value = "normal")]
        difficulty: cli::DifficultyArg,

        /// Let a spawner play the player side too
        #[arg(short, long)]
        autopilot: Option<cli::DifficultyArg>,

        /// JSON match config (default: built-in)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulation speed multiplier
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },

    /// Validate a match config and print the derived stat table
    Validate {
        /// JSON match config (default: built-in)
        config: Option<PathBuf>,

        /// Also print the effective config as JSON
        #[arg(long)]
        dump: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            seed,
            difficulty,
            autopilot,
            time_limit,
            tick_rate,
            config,
            format,
            events,
        } => cli::run::execute(cli::run::RunOptions {
            seed,
            difficulty: difficulty.into(),
            autopilot: autopilot.into(),
            time_limit,
            tick_rate,
            config,
            format,
            events,
        }),

        Commands::Batch {
            matches,
            seed,
            threads,
            difficulty,
            autopilot,
            time_limit,
            config,
            format,
            progress,
        } => cli::batch::execute(cli::batch::BatchOptions {
            matches,
            seed,
            threads,
            difficulty: difficulty.into(),
            autopilot: autopilot.into(),
            time_limit,
            config,
            format,
            progress,
        }),

        Commands::Watch {
            seed,
            difficulty,
            autopilot,
            config,
            speed,
        } => cli::watch::execute(seed, difficulty.into(), autopilot.map(Into::into), config, speed),

        Commands::Validate { config, dump } => cli::validate::execute(config, dump),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
