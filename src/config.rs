//! Match configuration.
//!
//! [`MatchConfig::default`] is the canonical tuning. Any part of it can be
//! overridden from a JSON file; fields missing from the file keep their
//! defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::game::{
    ArrivalPolicy, CollisionMode, EnergyRates, Grade, GradeWeightedTypes, SpawnTier, StatTable,
    Team, TypePolicy, TypeWeights, UniformTypes,
};

/// AI difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Slow spawns, low grades.
    Easy,
    /// The default tier.
    #[default]
    Normal,
    /// Fast spawns, every grade.
    Hard,
}

impl Difficulty {
    /// All tiers from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::invalid(format!("unknown difficulty '{other}'"))),
        }
    }
}

/// Battlefield geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Lane width in pixels.
    pub width: f64,
    /// y coordinate of the ground line.
    pub ground_y: f64,
    /// Gap between the lane edge and each castle.
    pub castle_margin: f64,
    /// Gap between a castle wall and a freshly spawned unit.
    pub spawn_offset: f64,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            ground_y: 550.0,
            castle_margin: 60.0,
            spawn_offset: 20.0,
        }
    }
}

/// Castle tuning, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastleConfig {
    /// Starting and maximum hp.
    pub max_hp: u32,
    /// Volley range, exclusive.
    pub attack_range: f64,
    /// Damage per projectile.
    pub attack_damage: u32,
    /// Seconds between volleys.
    pub attack_period: f64,
    /// Footprint width.
    pub width: f64,
    /// Footprint height.
    pub height: f64,
}

impl Default for CastleConfig {
    fn default() -> Self {
        Self {
            max_hp: 1000,
            attack_range: 500.0,
            attack_damage: 20,
            attack_period: 1.5,
            width: 80.0,
            height: 120.0,
        }
    }
}

/// Energy tuning. The pool cap comes from the difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Starting energy.
    pub initial: f64,
    /// Energy per second.
    pub regen_rate: f64,
    /// Energy per second inside the boost window.
    pub boost_rate: f64,
    /// Remaining seconds that open the boost window.
    pub boost_threshold: f64,
    /// Seconds between regeneration ticks.
    pub regen_period: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            initial: 10.0,
            regen_rate: 1.0,
            boost_rate: 2.0,
            boost_threshold: 30.0,
            regen_period: 0.1,
        }
    }
}

/// Projectile tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Travel speed in pixels per second.
    pub speed: f64,
    /// What a landing projectile hits.
    pub arrival: ArrivalPolicy,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 350.0,
            arrival: ArrivalPolicy::default(),
        }
    }
}

/// Spawn tiers for each difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct DifficultyTable {
    pub easy: SpawnTier,
    pub normal: SpawnTier,
    pub hard: SpawnTier,
}

impl DifficultyTable {
    /// Tier for a difficulty.
    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> &SpawnTier {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Mutable tier for a difficulty.
    pub const fn get_mut(&mut self, difficulty: Difficulty) -> &mut SpawnTier {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Normal => &mut self.normal,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        let up_to = |top: Grade| Grade::ALL.iter().copied().filter(|&g| g <= top).collect();
        Self {
            easy: SpawnTier {
                spawn_period: 4.0,
                allowed_grades: up_to(Grade::SuperEpic),
                max_energy: 30.0,
            },
            normal: SpawnTier {
                spawn_period: 3.0,
                allowed_grades: up_to(Grade::Legendary),
                max_energy: 40.0,
            },
            hard: SpawnTier {
                spawn_period: 2.0,
                allowed_grades: Grade::ALL.to_vec(),
                max_energy: 50.0,
            },
        }
    }
}

/// Serializable description of a [`TypePolicy`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypePolicyConfig {
    /// Every type equally likely.
    #[default]
    Uniform,
    /// Weighted by grade.
    GradeWeighted {
        /// Weights for specific grades.
        #[serde(default)]
        by_grade: BTreeMap<Grade, TypeWeights>,
        /// Weights for unlisted grades.
        #[serde(default)]
        fallback: TypeWeights,
    },
}

impl TypePolicyConfig {
    /// Instantiate the policy.
    #[must_use]
    pub fn build(&self) -> Box<dyn TypePolicy> {
        match self {
            TypePolicyConfig::Uniform => Box::new(UniformTypes),
            TypePolicyConfig::GradeWeighted { by_grade, fallback } => {
                Box::new(GradeWeightedTypes {
                    by_grade: by_grade.clone(),
                    fallback: *fallback,
                })
            }
        }
    }
}

/// Complete match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Geometry.
    pub lane: LaneConfig,
    /// Castle tuning.
    pub castle: CastleConfig,
    /// Energy tuning.
    pub energy: EnergyConfig,
    /// Projectile tuning.
    pub projectile: ProjectileConfig,
    /// Unit stat tables.
    pub stats: StatTable,
    /// Spawner tiers.
    pub difficulties: DifficultyTable,
    /// Maximum live units per team.
    pub field_cap: u32,
    /// Match length in seconds.
    pub total_time: f64,
    /// Cards dealt to the player.
    pub deck_size: usize,
    /// Grades the player's cards are drawn from.
    pub deck_grades: Vec<Grade>,
    /// How spawners choose unit types.
    pub type_policy: TypePolicyConfig,
    /// Source of melee contacts.
    pub collisions: CollisionMode,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            lane: LaneConfig::default(),
            castle: CastleConfig::default(),
            energy: EnergyConfig::default(),
            projectile: ProjectileConfig::default(),
            stats: StatTable::default(),
            difficulties: DifficultyTable::default(),
            field_cap: 7,
            total_time: 180.0,
            deck_size: 10,
            deck_grades: vec![Grade::Common, Grade::Rare, Grade::Epic, Grade::SuperEpic],
            type_policy: TypePolicyConfig::default(),
            collisions: CollisionMode::default(),
        }
    }
}

fn positive(value: f64, what: &str) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(format!("{what} must be positive, got {value}")))
    }
}

fn non_negative(value: f64, what: &str) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(format!("{what} must not be negative, got {value}")))
    }
}

impl MatchConfig {
    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid JSON,
    /// or fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid JSON or fails
    /// validation.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON rendering of this config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Energy rates for a match at `difficulty`.
    #[must_use]
    pub fn energy_rates(&self, difficulty: Difficulty) -> EnergyRates {
        EnergyRates {
            initial: self.energy.initial,
            max: self.difficulties.get(difficulty).max_energy,
            regen_rate: self.energy.regen_rate,
            boost_rate: self.energy.boost_rate,
            boost_threshold: self.energy.boost_threshold,
        }
    }

    /// x coordinate of a team's castle centre.
    #[must_use]
    pub fn castle_x(&self, team: Team) -> f64 {
        let half = self.castle.width / 2.0;
        match team {
            Team::Player => self.lane.castle_margin + half,
            Team::Ai => self.lane.width - self.lane.castle_margin - half,
        }
    }

    /// x coordinate where a team's units appear.
    #[must_use]
    pub fn spawn_x(&self, team: Team) -> f64 {
        let wall = self.castle.width / 2.0 + self.lane.spawn_offset;
        self.castle_x(team) + wall * team.direction()
    }

    /// Check that the config describes a playable match.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        positive(self.lane.width, "lane.width")?;
        non_negative(self.lane.castle_margin, "lane.castle_margin")?;
        non_negative(self.lane.spawn_offset, "lane.spawn_offset")?;
        if !self.lane.ground_y.is_finite() {
            return Err(ConfigError::invalid("lane.ground_y must be finite"));
        }
        if self.castle_x(Team::Player) >= self.castle_x(Team::Ai) {
            return Err(ConfigError::invalid("castles overlap: lane too narrow"));
        }

        if self.castle.max_hp == 0 {
            return Err(ConfigError::invalid("castle.max_hp must be positive"));
        }
        positive(self.castle.attack_range, "castle.attack_range")?;
        positive(self.castle.attack_period, "castle.attack_period")?;
        positive(self.castle.width, "castle.width")?;
        positive(self.castle.height, "castle.height")?;

        non_negative(self.energy.initial, "energy.initial")?;
        non_negative(self.energy.regen_rate, "energy.regen_rate")?;
        non_negative(self.energy.boost_rate, "energy.boost_rate")?;
        non_negative(self.energy.boost_threshold, "energy.boost_threshold")?;
        positive(self.energy.regen_period, "energy.regen_period")?;

        positive(self.projectile.speed, "projectile.speed")?;
        if let ArrivalPolicy::NearestToImpact { radius } = self.projectile.arrival {
            non_negative(radius, "projectile.arrival.radius")?;
        }

        self.validate_stats()?;

        for difficulty in Difficulty::ALL {
            let tier = self.difficulties.get(difficulty);
            positive(tier.spawn_period, &format!("difficulties.{difficulty}.spawn_period"))?;
            positive(tier.max_energy, &format!("difficulties.{difficulty}.max_energy"))?;
            if tier.allowed_grades.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "difficulties.{difficulty}.allowed_grades is empty"
                )));
            }
        }

        if self.field_cap == 0 {
            return Err(ConfigError::invalid("field_cap must be positive"));
        }
        positive(self.total_time, "total_time")?;
        if self.deck_size > 0 && self.deck_grades.is_empty() {
            return Err(ConfigError::invalid("deck_grades is empty but deck_size is not"));
        }
        Ok(())
    }

    fn validate_stats(&self) -> ConfigResult<()> {
        for grade in Grade::ALL {
            let base = self.stats.base_stats(grade);
            positive(base.width, &format!("stats.{grade}.width"))?;
            positive(base.height, &format!("stats.{grade}.height"))?;
            positive(base.speed, &format!("stats.{grade}.speed"))?;
            positive(base.range, &format!("stats.{grade}.range"))?;
            positive(base.cooldown, &format!("stats.{grade}.cooldown"))?;
            if base.hp == 0 {
                return Err(ConfigError::invalid(format!("stats.{grade}.hp must be positive")));
            }
        }
        for pair in Grade::ALL.windows(2) {
            if self.stats.cost(pair[0]) >= self.stats.cost(pair[1]) {
                return Err(ConfigError::invalid(format!(
                    "grade costs must strictly increase: {} costs {}, {} costs {}",
                    pair[0],
                    self.stats.cost(pair[0]),
                    pair[1],
                    self.stats.cost(pair[1]),
                )));
            }
        }
        for unit_type in crate::game::UnitType::ALL {
            let m = self.stats.modifiers(unit_type);
            positive(m.damage_mul, &format!("types.{unit_type}.damage_mul"))?;
            positive(m.hp_mul, &format!("types.{unit_type}.hp_mul"))?;
            positive(m.speed_mul, &format!("types.{unit_type}.speed_mul"))?;
        }
        for grade in Grade::ALL {
            for unit_type in crate::game::UnitType::ALL {
                if self.stats.derive(grade, unit_type).hp == 0 {
                    return Err(ConfigError::invalid(format!(
                        "{grade} {unit_type} derives to zero hp"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        MatchConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_geometry() {
        let config = MatchConfig::default();
        assert!((config.castle_x(Team::Player) - 100.0).abs() < f64::EPSILON);
        assert!((config.castle_x(Team::Ai) - 1180.0).abs() < f64::EPSILON);
        assert!((config.spawn_x(Team::Player) - 160.0).abs() < f64::EPSILON);
        assert!((config.spawn_x(Team::Ai) - 1120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tier_caps_energy() {
        let config = MatchConfig::default();
        assert!((config.energy_rates(Difficulty::Easy).max - 30.0).abs() < f64::EPSILON);
        assert!((config.energy_rates(Difficulty::Hard).max - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.difficulties.hard.allowed_grades.len(), 7);
        assert_eq!(config.difficulties.easy.allowed_grades.last(), Some(&Grade::SuperEpic));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = MatchConfig::default();
        config.projectile.arrival = ArrivalPolicy::NearestToImpact { radius: 25.0 };
        config.type_policy = TypePolicyConfig::GradeWeighted {
            by_grade: BTreeMap::from([(Grade::Hero, TypeWeights::default())]),
            fallback: TypeWeights::default(),
        };
        let text = config.to_json().unwrap();
        assert_eq!(MatchConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            MatchConfig::from_json(r#"{"field_cap": 3, "castle": {"max_hp": 500}}"#).unwrap();
        assert_eq!(config.field_cap, 3);
        assert_eq!(config.castle.max_hp, 500);
        assert!((config.castle.attack_period - 1.5).abs() < f64::EPSILON);
        assert!((config.total_time - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_legacy_and_unknown_grade_names_load() {
        let text = r#"{
            "deck_grades": ["common", "legend", "mythic_plus"],
            "difficulties": {
                "hard": {"spawn_period": 2, "allowed_grades": ["hero", "legend"], "max_energy": 50}
            },
            "type_policy": {
                "kind": "grade_weighted",
                "by_grade": {"legend": {"attacker": 1, "defender": 0, "speeder": 0}}
            }
        }"#;
        let config = MatchConfig::from_json(text).unwrap();
        assert_eq!(
            config.deck_grades,
            vec![Grade::Common, Grade::Legendary, Grade::Common]
        );
        assert_eq!(
            config.difficulties.hard.allowed_grades,
            vec![Grade::Hero, Grade::Legendary]
        );
        let TypePolicyConfig::GradeWeighted { by_grade, .. } = &config.type_policy else {
            panic!("expected grade weighted policy");
        };
        assert!(by_grade.contains_key(&Grade::Legendary));
    }

    #[test]
    fn test_rejects_non_increasing_costs() {
        let mut config = MatchConfig::default();
        config.stats.grades.rare.cost = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strictly increase"));
    }

    #[test]
    fn test_rejects_empty_grade_pool() {
        let mut config = MatchConfig::default();
        config.difficulties.hard.allowed_grades.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_period() {
        let mut config = MatchConfig::default();
        config.castle.attack_period = 0.0;
        assert!(config.validate().unwrap_err().to_string().contains("attack_period"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"total_time": 60}}"#).unwrap();
        let config = MatchConfig::load(file.path()).unwrap();
        assert!((config.total_time - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MatchConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }
}
