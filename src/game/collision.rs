//! Built-in melee contact detection.
//!
//! Headless runs have no physics engine, so the match asks this module for
//! overlapping opposing pairs each tick. A host with its own physics can
//! switch it off and report contacts through `notify_overlap` instead.

use serde::{Deserialize, Serialize};

use crate::game::{EntityId, Team, Unit};

/// Where melee contacts come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Axis-aligned bounding-box test every tick.
    #[default]
    BoundingBox,
    /// Only contacts reported by the host count.
    External,
}

/// All overlapping (player unit, AI unit) pairs among live units.
///
/// Pairs are ordered by the player unit's position in `units`, then the AI
/// unit's.
#[must_use]
pub fn detect_overlaps(units: &[Unit]) -> Vec<(EntityId, EntityId)> {
    let live = |team: Team| {
        units
            .iter()
            .filter(move |u| u.team() == team && !u.is_dead())
    };
    live(Team::Player)
        .flat_map(|p| {
            live(Team::Ai)
                .filter(|a| p.body.overlaps(&a.body))
                .map(|a| (p.id, a.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Damageable, Grade, Position, StatTable, UnitType};

    fn unit(id: EntityId, team: Team, x: f64) -> Unit {
        let stats = StatTable::default().derive(Grade::Common, UnitType::Attacker);
        Unit::new(id, team, Grade::Common, UnitType::Attacker, stats, Position::new(x, 550.0))
    }

    #[test]
    fn test_only_opposing_overlaps_reported() {
        let units = vec![
            unit(1, Team::Player, 600.0),
            unit(2, Team::Player, 610.0),
            unit(3, Team::Ai, 630.0),
            unit(4, Team::Ai, 900.0),
        ];
        assert_eq!(detect_overlaps(&units), vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_dead_units_ignored() {
        let mut units = vec![unit(1, Team::Player, 600.0), unit(2, Team::Ai, 610.0)];
        let _ = units[1].take_damage(10_000);
        assert!(detect_overlaps(&units).is_empty());
    }
}
