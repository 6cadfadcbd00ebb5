//! Headless batch runner.
//!
//! Provides a pure function interface: `(seed, config) -> MatchResult`.
//! Matches are independent, so many of them run in parallel with rayon and
//! their results are folded into [`BatchStats`].

// Tick counts and averages use intentional float/int casts
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::{Difficulty, MatchConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::game::{Damageable, MatchController, MatchEvent, Outcome, Team};

/// Configuration shared by every match of a batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Match rules.
    pub match_config: MatchConfig,
    /// AI difficulty.
    pub difficulty: Difficulty,
    /// Tier driving the player side.
    pub player_autopilot: Difficulty,
    /// Simulation steps per second.
    pub tick_rate: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            difficulty: Difficulty::Normal,
            player_autopilot: Difficulty::Normal,
            tick_rate: 60,
        }
    }
}

impl BatchConfig {
    /// Validate the match config and tick rate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if either is unusable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tick_rate == 0 {
            return Err(ConfigError::invalid("tick_rate must be positive"));
        }
        self.match_config.validate()
    }
}

/// Final result of one headless match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    /// Seed used for this match.
    pub seed: u64,
    /// How it ended.
    pub outcome: Outcome,
    /// Player castle hp at the end.
    pub player_hp: u32,
    /// AI castle hp at the end.
    pub ai_hp: u32,
    /// Seconds simulated.
    pub elapsed: f64,
    /// Ticks executed.
    pub ticks: u64,
    /// Units spawned, player then AI.
    pub spawned: [u32; 2],
    /// Units lost, player then AI.
    pub lost: [u32; 2],
    /// Projectiles fired by both castles.
    pub projectiles_fired: u32,
}

/// Run one match to completion, reporting every event to `on_event` along
/// with the match clock at the tick it happened.
///
/// The config is assumed valid.
pub fn run_match_with<F>(seed: u64, config: &BatchConfig, mut on_event: F) -> MatchResult
where
    F: FnMut(f64, &MatchEvent),
{
    let dt = 1.0 / f64::from(config.tick_rate.max(1));
    // The clock alone ends the match; the bound only guards against a
    // config that slipped past validation.
    let max_ticks =
        (config.match_config.total_time * f64::from(config.tick_rate)).ceil() as u64 + 2;

    let mut game = MatchController::new(config.match_config.clone(), config.difficulty, seed)
        .with_player_autopilot(config.player_autopilot);
    game.start();

    let mut spawned = [0u32; 2];
    let mut lost = [0u32; 2];
    let mut projectiles_fired = 0u32;
    let mut ticks = 0u64;
    let mut record = |elapsed: f64, event: &MatchEvent| {
        match event {
            MatchEvent::UnitSpawned { team, .. } => spawned[team.index()] += 1,
            MatchEvent::UnitDied { team, .. } => lost[team.index()] += 1,
            MatchEvent::ProjectileFired { .. } => projectiles_fired += 1,
            _ => {}
        }
        on_event(elapsed, event);
    };

    while !game.is_over() && ticks < max_ticks {
        game.tick(dt);
        ticks += 1;
        let elapsed = game.elapsed();
        for event in game.drain_events() {
            record(elapsed, &event);
        }
    }

    let outcome = game.summary().map_or(Outcome::TimeUp, |s| s.outcome);
    let result = MatchResult {
        seed,
        outcome,
        player_hp: game.castle(Team::Player).hp(),
        ai_hp: game.castle(Team::Ai).hp(),
        elapsed: game.elapsed(),
        ticks,
        spawned,
        lost,
        projectiles_fired,
    };
    debug!("seed {seed}: {outcome} after {ticks} ticks");
    result
}

/// Run one match to completion.
#[must_use]
pub fn run_match(seed: u64, config: &BatchConfig) -> MatchResult {
    run_match_with(seed, config, |_, _| {})
}

/// Aggregated statistics over many matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchStats {
    /// Matches played.
    pub matches: u64,
    /// Matches the player won.
    pub player_wins: u64,
    /// Matches the AI won.
    pub ai_wins: u64,
    /// Matches that ran out of time.
    pub time_ups: u64,
    total_elapsed: f64,
    total_player_hp: u64,
    total_ai_hp: u64,
    total_spawned: [u64; 2],
    total_lost: [u64; 2],
}

impl BatchStats {
    /// Empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one result in.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.matches += 1;
        match result.outcome {
            Outcome::Winner(Team::Player) => self.player_wins += 1,
            Outcome::Winner(Team::Ai) => self.ai_wins += 1,
            Outcome::TimeUp => self.time_ups += 1,
        }
        self.total_elapsed += result.elapsed;
        self.total_player_hp += u64::from(result.player_hp);
        self.total_ai_hp += u64::from(result.ai_hp);
        for i in 0..2 {
            self.total_spawned[i] += u64::from(result.spawned[i]);
            self.total_lost[i] += u64::from(result.lost[i]);
        }
    }

    /// Combine with stats from another worker.
    pub fn merge(&mut self, other: &BatchStats) {
        self.matches += other.matches;
        self.player_wins += other.player_wins;
        self.ai_wins += other.ai_wins;
        self.time_ups += other.time_ups;
        self.total_elapsed += other.total_elapsed;
        self.total_player_hp += other.total_player_hp;
        self.total_ai_hp += other.total_ai_hp;
        for i in 0..2 {
            self.total_spawned[i] += other.total_spawned[i];
            self.total_lost[i] += other.total_lost[i];
        }
    }

    fn average(&self, total: f64) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            total / self.matches as f64
        }
    }

    /// Fraction of matches won by `team`.
    #[must_use]
    pub fn win_rate(&self, team: Team) -> f64 {
        let wins = match team {
            Team::Player => self.player_wins,
            Team::Ai => self.ai_wins,
        };
        self.average(wins as f64)
    }

    /// Mean match length in seconds.
    #[must_use]
    pub fn average_duration(&self) -> f64 {
        self.average(self.total_elapsed)
    }

    /// Mean final castle hp of `team`.
    #[must_use]
    pub fn average_castle_hp(&self, team: Team) -> f64 {
        let total = match team {
            Team::Player => self.total_player_hp,
            Team::Ai => self.total_ai_hp,
        };
        self.average(total as f64)
    }

    /// Mean units spawned per match by `team`.
    #[must_use]
    pub fn average_spawned(&self, team: Team) -> f64 {
        self.average(self.total_spawned[team.index()] as f64)
    }

    /// Mean units lost per match by `team`.
    #[must_use]
    pub fn average_lost(&self, team: Team) -> f64 {
        self.average(self.total_lost[team.index()] as f64)
    }
}

/// Run `count` matches with seeds `base_seed, base_seed + 1, ...` in parallel.
///
/// Uses a lock-free fold/reduce: each rayon worker accumulates its own
/// [`BatchStats`], merged at the end.
///
/// # Errors
///
/// Returns [`ConfigError`] if the config fails validation.
pub fn run_batch(base_seed: u64, count: u64, config: &BatchConfig) -> ConfigResult<BatchStats> {
    config.validate()?;
    let stats = (0..count)
        .into_par_iter()
        .fold(BatchStats::new, |mut local, i| {
            local.add_result(&run_match(base_seed.wrapping_add(i), config));
            local
        })
        .reduce(BatchStats::new, |mut a, b| {
            a.merge(&b);
            a
        });
    Ok(stats)
}
