//! Nearest-enemy search shared by units and castles.
//!
//! Distance is horizontal only. The search starts with `max_range` as the
//! best distance and only accepts strictly smaller values, so a candidate at
//! exactly `max_range` is out of range and the earliest candidate wins ties.

use crate::game::{EntityId, TargetRef, Team};

/// A unit the seeker may target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Unit id.
    pub id: EntityId,
    /// Reference x coordinate.
    pub x: f64,
    /// Dead candidates are skipped.
    pub alive: bool,
}

/// The enemy castle as a targeting candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastleCandidate {
    /// Castle owner.
    pub team: Team,
    /// Point of the castle's extent nearest the seeker.
    pub near_edge_x: f64,
    /// A destroyed castle is skipped.
    pub alive: bool,
}

fn nearest_unit<I>(self_x: f64, units: I, max_range: f64) -> (Option<EntityId>, f64)
where
    I: IntoIterator<Item = Candidate>,
{
    let mut best = None;
    let mut best_distance = max_range;
    for candidate in units {
        if !candidate.alive {
            continue;
        }
        let distance = (candidate.x - self_x).abs();
        if distance < best_distance {
            best_distance = distance;
            best = Some(candidate.id);
        }
    }
    (best, best_distance)
}

/// Find the nearest live enemy within `max_range`.
///
/// Units are scanned first in the given order. The castle then overrides the
/// choice only if its near edge is strictly closer, so a unit standing at the
/// same distance as the castle wall keeps priority.
#[must_use]
pub fn find_target<I>(
    self_x: f64,
    units: I,
    castle: Option<CastleCandidate>,
    max_range: f64,
) -> Option<TargetRef>
where
    I: IntoIterator<Item = Candidate>,
{
    let (unit, best_distance) = nearest_unit(self_x, units, max_range);
    let closer = castle.filter(|c| c.alive && (c.near_edge_x - self_x).abs() < best_distance);
    match closer {
        Some(castle) => Some(TargetRef::Castle(castle.team)),
        None => unit.map(TargetRef::Unit),
    }
}

/// Unit-only search used by castle volleys.
#[must_use]
pub fn find_castle_target<I>(origin_x: f64, units: I, range: f64) -> Option<EntityId>
where
    I: IntoIterator<Item = Candidate>,
{
    nearest_unit(origin_x, units, range).0
}
