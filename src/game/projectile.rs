//! Delayed-damage carriers fired by castles.

use serde::{Deserialize, Serialize};

use crate::game::{EntityId, Position, TargetRef, Team};

/// What a projectile hits when it lands.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalPolicy {
    /// Damage the entity aimed at if and only if it is still alive.
    #[default]
    OriginalTarget,
    /// Damage the live enemy unit closest to the landing point, if within
    /// `radius` of it.
    NearestToImpact {
        /// Search radius around the landing point.
        radius: f64,
    },
}

/// A shot in flight toward a point captured when it was fired.
///
/// The projectile follows the captured point, not the live entity; what it
/// hits is decided on arrival by the match's arrival policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Arena id.
    pub id: EntityId,
    /// Team that fired it.
    pub team: Team,
    /// Where it was fired from.
    pub origin: Position,
    /// Current position.
    pub position: Position,
    /// Captured destination.
    pub target_point: Position,
    /// Entity targeted at fire time.
    pub intended: TargetRef,
    /// Damage dealt on a hit.
    pub damage: u32,
    /// Travel speed in pixels per second.
    pub speed: f64,
    total_distance: f64,
    traveled: f64,
    arrived: bool,
}

impl Projectile {
    /// Fire a projectile from `origin` toward `target_point`.
    #[must_use]
    pub fn new(
        id: EntityId,
        team: Team,
        origin: Position,
        target_point: Position,
        intended: TargetRef,
        damage: u32,
        speed: f64,
    ) -> Self {
        Self {
            id,
            team,
            origin,
            position: origin,
            target_point,
            intended,
            damage,
            speed,
            total_distance: origin.distance_to(target_point),
            traveled: 0.0,
            arrived: false,
        }
    }

    /// Length of the whole flight.
    #[must_use]
    pub const fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Distance covered so far.
    #[must_use]
    pub const fn traveled(&self) -> f64 {
        self.traveled
    }

    /// Whether the projectile has reached its destination.
    #[must_use]
    pub const fn arrived(&self) -> bool {
        self.arrived
    }

    /// Fraction of the flight completed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_distance <= 0.0 {
            return 1.0;
        }
        (self.traveled / self.total_distance).min(1.0)
    }

    /// Move along the flight path.
    ///
    /// Returns `true` exactly once, on the step that reaches the destination.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.arrived {
            return false;
        }
        self.traveled += self.speed * dt.max(0.0);
        if self.traveled >= self.total_distance {
            self.traveled = self.total_distance;
            self.position = self.target_point;
            self.arrived = true;
            return true;
        }
        let t = self.progress();
        self.position = Position::new(
            self.origin.x + (self.target_point.x - self.origin.x) * t,
            self.origin.y + (self.target_point.y - self.origin.y) * t,
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(to: Position) -> Projectile {
        Projectile::new(
            7,
            Team::Player,
            Position::new(0.0, 0.0),
            to,
            TargetRef::Unit(3),
            20,
            350.0,
        )
    }

    #[test]
    fn test_arrival_is_one_shot() {
        let mut p = shot(Position::new(350.0, 0.0));
        assert!(!p.advance(0.5));
        assert!((p.position.x - 175.0).abs() < 1e-9);
        assert!(p.advance(0.6));
        assert_eq!(p.position, Position::new(350.0, 0.0));
        assert!(!p.advance(1.0));
        assert!(p.arrived());
    }

    #[test]
    fn test_zero_distance_arrives_on_first_step() {
        let mut p = shot(Position::new(0.0, 0.0));
        assert!(p.advance(0.0));
        assert!((p.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_traveled_never_exceeds_total() {
        let mut p = shot(Position::new(30.0, 40.0));
        let _ = p.advance(10.0);
        assert!((p.traveled() - p.total_distance()).abs() < f64::EPSILON);
        assert!((p.total_distance() - 50.0).abs() < 1e-12);
    }
}
