//! Stationary team bases.

use crate::game::{Body, DamageResult, Damageable, Position, Team};

/// A team's base. One per team, never removed from the match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Castle {
    /// Footprint and owning team.
    pub body: Body,
    hp: u32,
    max_hp: u32,
    /// Maximum distance to a target, exclusive.
    pub attack_range: f64,
    /// Damage carried by each projectile.
    pub attack_damage: u32,
    /// Seconds between volleys.
    pub attack_period: f64,
}

impl Castle {
    /// Create a castle at full health.
    #[must_use]
    pub const fn new(
        body: Body,
        max_hp: u32,
        attack_range: f64,
        attack_damage: u32,
        attack_period: f64,
    ) -> Self {
        Self {
            body,
            hp: max_hp,
            max_hp,
            attack_range,
            attack_damage,
            attack_period,
        }
    }

    /// Owning team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.body.team
    }

    /// Restore hp, clamped at maximum.
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Where projectiles leave the castle: centred, just above the roof.
    #[must_use]
    pub fn emission_point(&self) -> Position {
        Position::new(self.body.position.x, self.body.top() - 10.0)
    }

    /// Edge of the castle closest to a seeker at `x`.
    #[must_use]
    pub fn near_edge(&self, x: f64) -> f64 {
        self.body.nearest_x(x)
    }
}

impl Damageable for Castle {
    fn hp(&self) -> u32 {
        self.hp
    }

    fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn take_damage(&mut self, amount: u32) -> DamageResult {
        if self.hp == 0 {
            return DamageResult::Ignored;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            DamageResult::Killed
        } else {
            DamageResult::Wounded { remaining: self.hp }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castle() -> Castle {
        let body = Body::new(Team::Player, Position::new(100.0, 550.0), 80.0, 120.0);
        Castle::new(body, 1000, 500.0, 20, 1.5)
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut c = castle();
        assert_eq!(c.take_damage(300), DamageResult::Wounded { remaining: 700 });
        c.heal(5000);
        assert_eq!(c.hp(), 1000);
        assert!(c.take_damage(2000).is_kill());
        assert_eq!(c.hp(), 0);
        assert_eq!(c.take_damage(1), DamageResult::Ignored);
    }

    #[test]
    fn test_emission_point_above_roof() {
        let c = castle();
        let p = c.emission_point();
        assert!((p.x - 100.0).abs() < f64::EPSILON);
        assert!((p.y - 420.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hp_ratio() {
        let mut c = castle();
        let _ = c.take_damage(250);
        assert!((c.hp_ratio() - 0.75).abs() < 1e-12);
    }
}
