// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Rampart: a deterministic castle-defense battle simulation engine.
//!
//! Two castles at opposite ends of a lane spawn units that march toward each
//! other, fight, and try to bring down the enemy castle before the clock runs
//! out. This crate is the headless engine:
//! - Fixed-order tick loop driven by an explicit `dt`
//! - Seeded randomness, so a `(seed, config)` pair always replays the same
//! - Read-only snapshots for any renderer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │          Batch Runner               │
//! ├─────────────────────────────────────┤
//! │        MatchController              │
//! ├─────────────────────────────────────┤
//! │  Units · Castles · Projectiles      │
//! │  Economy · Spawners · Scheduler     │
//! └─────────────────────────────────────┘
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod game;

pub use config::{Difficulty, MatchConfig};
pub use error::{ConfigError, ConfigResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Grade, MatchController, MatchEvent, MatchPhase, MatchSummary, Outcome, SpawnOutcome,
    TargetRef, Team, UnitType,
};
