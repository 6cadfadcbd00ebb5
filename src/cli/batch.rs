//! Batch command implementation.

use super::output::{JsonBatchResult, format_batch_csv, format_batch_text};
use super::{BatchFormat, CliError, load_config, seed_or_random};
use indicatif::{ProgressBar, ProgressStyle};
use rampart::Difficulty;
use rampart::batch::{BatchConfig, BatchStats, run_match};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

/// Options for the batch command.
#[derive(Debug)]
pub(crate) struct BatchOptions {
    pub(crate) matches: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) threads: Option<usize>,
    pub(crate) difficulty: Difficulty,
    pub(crate) autopilot: Difficulty,
    pub(crate) time_limit: Option<f64>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) format: BatchFormat,
    pub(crate) progress: bool,
}

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
#[allow(clippy::needless_pass_by_value, clippy::cast_precision_loss)]
pub(crate) fn execute(options: BatchOptions) -> Result<(), CliError> {
    let match_config = load_config(options.config.as_deref(), options.time_limit)?;
    let config = BatchConfig {
        match_config,
        difficulty: options.difficulty,
        player_autopilot: options.autopilot,
        ..BatchConfig::default()
    };
    config.validate()?;

    // Set thread pool size if specified
    if let Some(num_threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_random(options.seed);

    let pb = if options.progress {
        let pb = ProgressBar::new(options.matches);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each rayon worker folds into its own stats; merged at the end.
    let stats = (0..options.matches)
        .into_par_iter()
        .fold(BatchStats::new, |mut local, i| {
            local.add_result(&run_match(base_seed.wrapping_add(i), &config));
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(BatchStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let matches_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.matches as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match options.format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} matches/sec, base seed {base_seed})",
                duration.as_secs_f64(),
                matches_per_sec
            );
        }
        BatchFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_stats(&stats))?;
            println!("{json}");
        }
        BatchFormat::Csv => {
            print!("{}", format_batch_csv(&stats));
        }
    }

    Ok(())
}
