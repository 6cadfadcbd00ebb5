//! Battle simulation.
//!
//! Implements the match rules:
//! - Castles with periodic ranged volleys
//! - Units with a move-or-attack state machine and per-unit cooldowns
//! - Projectiles carrying delayed damage
//! - Energy economy with field capacity
//! - Autonomous spawners and the player's card deck

mod castle;
mod collision;
mod deck;
mod economy;
mod entity;
mod events;
pub mod invariants;
mod projectile;
mod scheduler;
mod snapshot;
mod spawner;
mod state;
mod stats;
mod targeting;
mod unit;

pub use castle::Castle;
pub use collision::{CollisionMode, detect_overlaps};
pub use deck::{Card, Deck};
pub use economy::{Admission, Economy, EnergyRates};
pub use entity::{Body, DamageResult, Damageable, EntityId, Position, TargetRef, Team};
pub use events::{MatchEvent, MatchSummary, Outcome};
pub use projectile::{ArrivalPolicy, Projectile};
pub use scheduler::{ScheduledEvent, Scheduler};
pub use snapshot::{CastleView, HudReadout, ProjectileView, Snapshot, UnitView};
pub use spawner::{GradeWeightedTypes, SpawnTier, Spawner, TypePolicy, TypeWeights, UniformTypes};
pub use state::{MatchController, MatchPhase, SpawnOutcome};
pub use stats::{
    BaseStats, Grade, GradeTable, StatTable, TypeModifiers, TypeTable, UnitStats, UnitType,
};
pub use targeting::{Candidate, CastleCandidate, find_castle_target, find_target};
pub use unit::{Unit, UnitState};
