//! Output formatting utilities for CLI.

use rampart::batch::{BatchStats, MatchResult};
use rampart::game::{StatTable, UnitType};
use rampart::{Difficulty, Grade, MatchEvent, Outcome, Team};
use serde::Serialize;

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Winner(Team::Player) => "Player wins",
        Outcome::Winner(Team::Ai) => "AI wins",
        Outcome::TimeUp => "Time up",
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_match_text(result: &MatchResult, difficulty: Difficulty) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Match Result (seed: {}, difficulty: {difficulty})\n",
        result.seed
    ));
    output.push_str(&format!("  Outcome: {}\n", outcome_label(result.outcome)));
    output.push_str(&format!(
        "  Duration: {:.1}s ({} ticks)\n\n",
        result.elapsed, result.ticks
    ));

    for team in Team::ALL {
        let hp = match team {
            Team::Player => result.player_hp,
            Team::Ai => result.ai_hp,
        };
        output.push_str(&format!(
            "  {:<6} castle {:>4} hp | spawned {:>3} | lost {:>3}\n",
            team.name(),
            hp,
            result.spawned[team.index()],
            result.lost[team.index()]
        ));
    }
    output.push_str(&format!(
        "  Projectiles fired: {}\n",
        result.projectiles_fired
    ));

    output
}

/// One event as a single log line.
pub(super) fn format_event(elapsed: f64, event: &MatchEvent) -> String {
    let body = match event {
        MatchEvent::Started => "match started".to_string(),
        MatchEvent::UnitSpawned {
            id,
            team,
            grade,
            unit_type,
        } => format!("{team} spawned {grade} {unit_type} #{id}"),
        MatchEvent::UnitDied { id, team } => format!("{team} unit #{id} died"),
        MatchEvent::ProjectileFired { id, team, target } => {
            format!("{team} castle fired #{id} at #{target}")
        }
        MatchEvent::ProjectileLanded { id, struck } => match struck {
            Some(target) => format!("projectile #{id} hit {target:?}"),
            None => format!("projectile #{id} absorbed"),
        },
        MatchEvent::CastleDamaged {
            team,
            amount,
            remaining,
        } => format!("{team} castle took {amount} ({remaining} left)"),
        MatchEvent::GameOver(summary) => format!("game over: {}", summary.outcome),
    };
    format!("[{elapsed:>7.2}s] {body}")
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Matches played.
    matches: u64,
    /// Player wins.
    player_wins: u64,
    /// AI wins.
    ai_wins: u64,
    /// Matches ending on time.
    time_ups: u64,
    /// Player win rate (0.0-1.0).
    player_win_rate: f64,
    /// AI win rate (0.0-1.0).
    ai_win_rate: f64,
    /// Average match length in seconds.
    avg_duration: f64,
    /// Per-team averages.
    teams: Vec<JsonTeamStats>,
}

/// JSON-serializable per-team batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTeamStats {
    /// Team name.
    team: &'static str,
    /// Average final castle hp.
    avg_castle_hp: f64,
    /// Average units spawned.
    avg_spawned: f64,
    /// Average units lost.
    avg_lost: f64,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats) -> Self {
        Self {
            matches: stats.matches,
            player_wins: stats.player_wins,
            ai_wins: stats.ai_wins,
            time_ups: stats.time_ups,
            player_win_rate: stats.win_rate(Team::Player),
            ai_win_rate: stats.win_rate(Team::Ai),
            avg_duration: stats.average_duration(),
            teams: Team::ALL
                .iter()
                .map(|&team| JsonTeamStats {
                    team: team.name(),
                    avg_castle_hp: stats.average_castle_hp(team),
                    avg_spawned: stats.average_spawned(team),
                    avg_lost: stats.average_lost(team),
                })
                .collect(),
        }
    }
}

/// Format batch stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();
    let pct = |n: u64| {
        if stats.matches == 0 {
            0.0
        } else {
            n as f64 / stats.matches as f64 * 100.0
        }
    };

    output.push_str(&format!("Batch Results ({} matches)\n", stats.matches));
    output.push_str("========================================\n\n");

    output.push_str("Outcomes:\n");
    output.push_str(&format!(
        "  Player wins: {:.1}% ({})\n",
        pct(stats.player_wins),
        stats.player_wins
    ));
    output.push_str(&format!(
        "  AI wins:     {:.1}% ({})\n",
        pct(stats.ai_wins),
        stats.ai_wins
    ));
    output.push_str(&format!(
        "  Time up:     {:.1}% ({})\n\n",
        pct(stats.time_ups),
        stats.time_ups
    ));

    output.push_str("Averages:\n");
    for team in Team::ALL {
        output.push_str(&format!(
            "  {:<6} castle {:.0} hp, spawned {:.1}, lost {:.1}\n",
            team.name(),
            stats.average_castle_hp(team),
            stats.average_spawned(team),
            stats.average_lost(team)
        ));
    }

    output.push_str(&format!(
        "\nAverage Match Length: {:.1}s\n",
        stats.average_duration()
    ));

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str("team,wins,win_rate,avg_castle_hp,avg_spawned,avg_lost\n");

    for team in Team::ALL {
        let wins = match team {
            Team::Player => stats.player_wins,
            Team::Ai => stats.ai_wins,
        };
        output.push_str(&format!(
            "{},{},{:.4},{:.2},{:.2},{:.2}\n",
            team.name(),
            wins,
            stats.win_rate(team),
            stats.average_castle_hp(team),
            stats.average_spawned(team),
            stats.average_lost(team)
        ));
    }

    output
}

/// Format the derived stat table, one row per (grade, type).
pub(super) fn format_stat_table(stats: &StatTable) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  {:<10} {:<8} {:>5} {:>5} {:>6} {:>5} {:>5} {:>4}\n",
        "grade", "type", "hp", "dmg", "speed", "range", "cd", "cost"
    ));
    for grade in Grade::ALL {
        for unit_type in UnitType::ALL {
            let s = stats.derive(grade, unit_type);
            output.push_str(&format!(
                "  {:<10} {:<8} {:>5} {:>5} {:>6.1} {:>5.0} {:>5.1} {:>4}\n",
                grade.name(),
                unit_type.name(),
                s.hp,
                s.damage,
                s.speed,
                s.range,
                s.cooldown,
                s.cost
            ));
        }
    }

    output
}
