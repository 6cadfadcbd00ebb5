//! Run command implementation.

use super::output::{format_event, format_match_text};
use super::{CliError, OutputFormat, load_config, seed_or_random};
use rampart::Difficulty;
use rampart::batch::{BatchConfig, run_match_with};
use std::path::PathBuf;

/// Options for the run command.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub(crate) seed: Option<u64>,
    pub(crate) difficulty: Difficulty,
    pub(crate) autopilot: Difficulty,
    pub(crate) time_limit: Option<f64>,
    pub(crate) tick_rate: u32,
    pub(crate) config: Option<PathBuf>,
    pub(crate) format: OutputFormat,
    pub(crate) events: bool,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or output fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(options: RunOptions) -> Result<(), CliError> {
    let match_config = load_config(options.config.as_deref(), options.time_limit)?;
    let seed = seed_or_random(options.seed);
    let config = BatchConfig {
        match_config,
        difficulty: options.difficulty,
        player_autopilot: options.autopilot,
        tick_rate: options.tick_rate,
    };
    config.validate()?;

    let print_events = options.events && options.format == OutputFormat::Text;
    let result = run_match_with(seed, &config, |elapsed, event| {
        if print_events {
            println!("{}", format_event(elapsed, event));
        }
    });

    match options.format {
        OutputFormat::Text => {
            if print_events {
                println!();
            }
            print!("{}", format_match_text(&result, options.difficulty));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)?;
            println!("{json}");
        }
    }

    Ok(())
}
