//! Mobile combatants and their movement/attack state machine.

use crate::game::{
    Body, DamageResult, Damageable, EntityId, Grade, Position, TargetRef, Team, UnitStats,
    UnitType,
};

/// Behaviour state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitState {
    /// No target in range; marching toward the enemy castle.
    Moving,
    /// Holding position and attacking its target.
    Attacking,
    /// Terminal. hp is zero and the unit is ignored by everything.
    Dead,
}

impl UnitState {
    /// Lowercase name used in snapshots and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnitState::Moving => "moving",
            UnitState::Attacking => "attacking",
            UnitState::Dead => "dead",
        }
    }
}

/// A spawned combatant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// Arena id.
    pub id: EntityId,
    /// Footprint and owning team.
    pub body: Body,
    /// Power tier.
    pub grade: Grade,
    /// Role.
    pub unit_type: UnitType,
    /// Derived combat stats.
    pub stats: UnitStats,
    hp: u32,
    state: UnitState,
    target: Option<TargetRef>,
    cooldown_active: bool,
}

impl Unit {
    /// Create a unit at full health, standing on the ground at `x`.
    #[must_use]
    pub fn new(
        id: EntityId,
        team: Team,
        grade: Grade,
        unit_type: UnitType,
        stats: UnitStats,
        position: Position,
    ) -> Self {
        Self {
            id,
            body: Body::new(team, position, stats.width, stats.height),
            grade,
            unit_type,
            stats,
            hp: stats.hp,
            state: UnitState::Moving,
            target: None,
            cooldown_active: false,
        }
    }

    /// Owning team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.body.team
    }

    /// Horizontal position.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.body.position.x
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> UnitState {
        self.state
    }

    /// Current target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<TargetRef> {
        self.target
    }

    /// Whether the unit is waiting out its attack cooldown.
    #[must_use]
    pub const fn cooldown_active(&self) -> bool {
        self.cooldown_active
    }

    /// Whether the unit is dead.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        matches!(self.state, UnitState::Dead)
    }

    /// Replace the target. `Some` switches to attacking, `None` to moving.
    ///
    /// Dead units stay dead.
    pub fn retarget(&mut self, target: Option<TargetRef>) {
        if self.is_dead() {
            return;
        }
        self.target = target;
        self.state = if target.is_some() {
            UnitState::Attacking
        } else {
            UnitState::Moving
        };
    }

    /// March along the lane. Only moving units move.
    pub fn advance(&mut self, dt: f64) {
        if self.state == UnitState::Moving {
            self.body.position.x += self.stats.speed * self.team().direction() * dt;
        }
    }

    /// Start an attack if the cooldown allows it.
    ///
    /// Returns the damage to deal and arms the cooldown. The caller schedules
    /// the matching [`finish_cooldown`](Self::finish_cooldown).
    #[must_use]
    pub fn begin_attack(&mut self) -> Option<u32> {
        if self.is_dead() || self.cooldown_active {
            return None;
        }
        self.cooldown_active = true;
        Some(self.stats.damage)
    }

    /// Clear the cooldown flag.
    pub fn finish_cooldown(&mut self) {
        self.cooldown_active = false;
    }
}

impl Damageable for Unit {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    fn take_damage(&mut self, amount: u32) -> DamageResult {
        if self.is_dead() {
            return DamageResult::Ignored;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.state = UnitState::Dead;
            self.target = None;
            DamageResult::Killed
        } else {
            DamageResult::Wounded { remaining: self.hp }
        }
    }

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }
}
