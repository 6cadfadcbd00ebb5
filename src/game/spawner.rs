//! Timer-driven autonomous spawning.
//!
//! A [`Spawner`] decides *what* to spawn each cycle; the match decides
//! *whether* the spawn is admitted. The AI side always has one, and the
//! player side gets one in headless runs ("autopilot").

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::game::{Grade, StatTable, Team, UnitType};

/// How a spawner picks a unit type once the grade is fixed.
pub trait TypePolicy: fmt::Debug + Send + Sync {
    /// Choose a type for a unit of `grade`.
    fn pick(&self, grade: Grade, rng: &mut dyn RngCore) -> UnitType;
}

/// Every type equally likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformTypes;

impl TypePolicy for UniformTypes {
    fn pick(&self, _grade: Grade, rng: &mut dyn RngCore) -> UnitType {
        UnitType::ALL
            .choose(rng)
            .copied()
            .unwrap_or(UnitType::Attacker)
    }
}

/// Relative weights for each unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TypeWeights {
    pub attacker: f64,
    pub defender: f64,
    pub speeder: f64,
}

impl Default for TypeWeights {
    fn default() -> Self {
        Self {
            attacker: 1.0,
            defender: 1.0,
            speeder: 1.0,
        }
    }
}

impl TypeWeights {
    fn pairs(&self) -> [(UnitType, f64); 3] {
        [
            (UnitType::Attacker, self.attacker.max(0.0)),
            (UnitType::Defender, self.defender.max(0.0)),
            (UnitType::Speeder, self.speeder.max(0.0)),
        ]
    }

    /// Weighted roll. All-zero weights fall back to attacker.
    fn roll(&self, rng: &mut dyn RngCore) -> UnitType {
        let pairs = self.pairs();
        let total: f64 = pairs.iter().map(|(_, w)| w).sum();
        if !total.is_finite() || total <= 0.0 {
            return UnitType::Attacker;
        }
        let roll = rng.random_range(0.0..total);
        let mut acc = 0.0;
        for (unit_type, weight) in pairs {
            acc += weight;
            if roll < acc {
                return unit_type;
            }
        }
        pairs
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map_or(UnitType::Attacker, |(t, _)| *t)
    }
}

/// Per-grade type weights with a default for unlisted grades.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradeWeightedTypes {
    /// Weights for specific grades.
    pub by_grade: BTreeMap<Grade, TypeWeights>,
    /// Weights for grades missing from `by_grade`.
    pub fallback: TypeWeights,
}

impl TypePolicy for GradeWeightedTypes {
    fn pick(&self, grade: Grade, rng: &mut dyn RngCore) -> UnitType {
        self.by_grade
            .get(&grade)
            .unwrap_or(&self.fallback)
            .roll(rng)
    }
}

/// Spawn tuning for one difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTier {
    /// Seconds between spawn attempts.
    pub spawn_period: f64,
    /// Grades this tier may spawn.
    pub allowed_grades: Vec<Grade>,
    /// Energy pool cap while this tier is in play.
    pub max_energy: f64,
}

/// Autonomous spawn policy for one team.
#[derive(Debug)]
pub struct Spawner {
    /// Team it spawns for.
    pub team: Team,
    /// Timing and grade pool.
    pub tier: SpawnTier,
    policy: Box<dyn TypePolicy>,
}

impl Spawner {
    /// Create a spawner.
    #[must_use]
    pub fn new(team: Team, tier: SpawnTier, policy: Box<dyn TypePolicy>) -> Self {
        Self { team, tier, policy }
    }

    /// Choose what to spawn with `energy` available.
    ///
    /// Picks uniformly among the allowed grades the team can afford, then asks
    /// the type policy. `None` means the team is starved this cycle.
    pub fn choose(
        &self,
        energy: f64,
        stats: &StatTable,
        rng: &mut dyn RngCore,
    ) -> Option<(Grade, UnitType)> {
        let affordable: Vec<Grade> = self
            .tier
            .allowed_grades
            .iter()
            .copied()
            .filter(|&g| f64::from(stats.cost(g)) <= energy)
            .collect();
        let grade = *affordable.choose(rng)?;
        Some((grade, self.policy.pick(grade, rng)))
    }
}
