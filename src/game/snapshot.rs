//! Read-only views of a match for renderers and HUDs.

use serde::Serialize;

use crate::game::{EntityId, Grade, Position, Team, UnitType};

/// A castle as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CastleView {
    /// Owner.
    pub team: Team,
    /// Bottom-centre anchor.
    pub position: Position,
    /// Footprint width.
    pub width: f64,
    /// Footprint height.
    pub height: f64,
    /// Current hp.
    pub hp: u32,
    /// hp as a fraction of maximum.
    pub hp_ratio: f64,
}

/// A unit as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitView {
    /// Arena id.
    pub id: EntityId,
    /// Owner.
    pub team: Team,
    /// Grade.
    pub grade: Grade,
    /// Type.
    pub unit_type: UnitType,
    /// Bottom-centre anchor.
    pub position: Position,
    /// Footprint width.
    pub width: f64,
    /// Footprint height.
    pub height: f64,
    /// hp as a fraction of maximum.
    pub hp_ratio: f64,
    /// `moving`, `attacking` or `dead`.
    pub state: &'static str,
}

/// A projectile as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    /// Arena id.
    pub id: EntityId,
    /// Firing team.
    pub team: Team,
    /// Current position.
    pub position: Position,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Seconds simulated.
    pub elapsed: f64,
    /// Seconds left.
    pub remaining_time: f64,
    /// Player castle first, then AI.
    pub castles: [CastleView; 2],
    /// Units in arena order.
    pub units: Vec<UnitView>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileView>,
}

/// Numbers shown in the player's HUD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudReadout {
    /// Player castle hp.
    pub player_hp: u32,
    /// AI castle hp.
    pub ai_hp: u32,
    /// Player energy, rounded down for display.
    pub player_energy: u32,
    /// Seconds left, rounded up for display.
    pub remaining_time: u32,
    /// Live player units.
    pub field_count: u32,
    /// Player field cap.
    pub field_cap: u32,
}
