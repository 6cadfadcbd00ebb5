//! Match event log and end-of-match summary.

use std::fmt;

use serde::Serialize;

use crate::game::{EntityId, Grade, TargetRef, Team, UnitType};

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// One castle fell.
    Winner(Team),
    /// The clock ran out with both castles standing.
    TimeUp,
}

impl Outcome {
    /// Winning team, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Team> {
        match self {
            Outcome::Winner(team) => Some(team),
            Outcome::TimeUp => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(team) => write!(f, "{team} wins"),
            Outcome::TimeUp => f.write_str("time up"),
        }
    }
}

/// Final state reported once when a match ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchSummary {
    /// Result.
    pub outcome: Outcome,
    /// Player castle hp at the end.
    pub player_hp: u32,
    /// AI castle hp at the end.
    pub ai_hp: u32,
    /// Seconds left on the clock (never negative).
    pub remaining_time: f64,
    /// Seconds simulated.
    pub elapsed: f64,
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    /// `start()` was called.
    Started,
    /// A spawn was admitted.
    UnitSpawned {
        /// New unit.
        id: EntityId,
        /// Owner.
        team: Team,
        /// Grade.
        grade: Grade,
        /// Type.
        unit_type: UnitType,
    },
    /// A unit's hp reached zero.
    UnitDied {
        /// Dead unit.
        id: EntityId,
        /// Owner.
        team: Team,
    },
    /// A castle launched a projectile.
    ProjectileFired {
        /// Projectile id.
        id: EntityId,
        /// Firing team.
        team: Team,
        /// Unit aimed at.
        target: EntityId,
    },
    /// A projectile reached its destination.
    ProjectileLanded {
        /// Projectile id.
        id: EntityId,
        /// What took the damage, or `None` if it was absorbed.
        struck: Option<TargetRef>,
    },
    /// A castle lost hp.
    CastleDamaged {
        /// Castle owner.
        team: Team,
        /// Damage dealt.
        amount: u32,
        /// hp left.
        remaining: u32,
    },
    /// The match ended. Emitted exactly once.
    GameOver(MatchSummary),
}
