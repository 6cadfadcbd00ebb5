//! Unit stat tables.
//!
//! A unit's combat numbers come from two inputs: its grade (power tier, which
//! also fixes its spawn cost) and its type (a role modifier applied on top).
//! The tables are configuration data; [`StatTable::default`] is the canonical
//! tuning.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Power tier of a unit, ordered by escalating strength and cost.
///
/// Deserializes through [`Grade::from_name`], so config files may use the
/// legacy `legend` spelling and unknown names degrade to `common`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Grade {
    /// Weakest and cheapest tier. Also the fallback for unknown names.
    Common,
    /// Second tier.
    Rare,
    /// Third tier.
    Epic,
    /// Fourth tier.
    SuperEpic,
    /// Fifth tier.
    Mystic,
    /// Sixth tier.
    Legendary,
    /// Strongest tier.
    Hero,
}

impl Grade {
    /// All grades in ascending order.
    pub const ALL: [Grade; 7] = [
        Grade::Common,
        Grade::Rare,
        Grade::Epic,
        Grade::SuperEpic,
        Grade::Mystic,
        Grade::Legendary,
        Grade::Hero,
    ];

    /// Canonical snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Grade::Common => "common",
            Grade::Rare => "rare",
            Grade::Epic => "epic",
            Grade::SuperEpic => "super_epic",
            Grade::Mystic => "mystic",
            Grade::Legendary => "legendary",
            Grade::Hero => "hero",
        }
    }

    /// Parse a grade name. Unknown names fall back to [`Grade::Common`].
    ///
    /// The older four-tier tables called the sixth tier `legend`; that
    /// spelling is still accepted.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rare" => Grade::Rare,
            "epic" => Grade::Epic,
            "super_epic" | "superepic" => Grade::SuperEpic,
            "mystic" => Grade::Mystic,
            "legendary" | "legend" => Grade::Legendary,
            "hero" => Grade::Hero,
            _ => Grade::Common,
        }
    }
}

impl From<String> for Grade {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combat role applied on top of a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum UnitType {
    /// Trades hp for damage. Also the fallback for unknown names.
    Attacker,
    /// Trades damage and speed for hp.
    Defender,
    /// Trades damage and hp for speed.
    Speeder,
}

impl UnitType {
    /// All types in declaration order.
    pub const ALL: [UnitType; 3] = [UnitType::Attacker, UnitType::Defender, UnitType::Speeder];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Attacker => "attacker",
            UnitType::Defender => "defender",
            UnitType::Speeder => "speeder",
        }
    }

    /// Parse a type name. Unknown names fall back to [`UnitType::Attacker`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "defender" => UnitType::Defender,
            "speeder" => UnitType::Speeder,
            _ => UnitType::Attacker,
        }
    }
}

impl From<String> for UnitType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-grade base numbers before the type modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Body width in pixels.
    pub width: f64,
    /// Body height in pixels.
    pub height: f64,
    /// Marching speed in pixels per second.
    pub speed: f64,
    /// Damage per attack.
    pub damage: u32,
    /// Attack range in pixels (exclusive).
    pub range: f64,
    /// Seconds between attacks.
    pub cooldown: f64,
    /// Hit points.
    pub hp: u32,
    /// Energy cost to spawn.
    pub cost: u32,
}

/// Multipliers a unit type applies to its grade's base stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeModifiers {
    /// Damage multiplier.
    pub damage_mul: f64,
    /// Hit-point multiplier.
    pub hp_mul: f64,
    /// Speed multiplier.
    pub speed_mul: f64,
}

/// Final stats for a (grade, type) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStats {
    /// Body width in pixels.
    pub width: f64,
    /// Body height in pixels.
    pub height: f64,
    /// Marching speed in pixels per second (fractional).
    pub speed: f64,
    /// Damage per attack (floored).
    pub damage: u32,
    /// Attack range in pixels (exclusive).
    pub range: f64,
    /// Seconds between attacks.
    pub cooldown: f64,
    /// Hit points (floored).
    pub hp: u32,
    /// Energy cost to spawn.
    pub cost: u32,
}

/// Base stats for every grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct GradeTable {
    pub common: BaseStats,
    pub rare: BaseStats,
    pub epic: BaseStats,
    pub super_epic: BaseStats,
    pub mystic: BaseStats,
    pub legendary: BaseStats,
    pub hero: BaseStats,
}

impl GradeTable {
    /// Look up a grade's row.
    #[must_use]
    pub const fn get(&self, grade: Grade) -> &BaseStats {
        match grade {
            Grade::Common => &self.common,
            Grade::Rare => &self.rare,
            Grade::Epic => &self.epic,
            Grade::SuperEpic => &self.super_epic,
            Grade::Mystic => &self.mystic,
            Grade::Legendary => &self.legendary,
            Grade::Hero => &self.hero,
        }
    }
}

/// Modifiers for every unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TypeTable {
    pub attacker: TypeModifiers,
    pub defender: TypeModifiers,
    pub speeder: TypeModifiers,
}

impl TypeTable {
    /// Look up a type's modifiers.
    #[must_use]
    pub const fn get(&self, unit_type: UnitType) -> &TypeModifiers {
        match unit_type {
            UnitType::Attacker => &self.attacker,
            UnitType::Defender => &self.defender,
            UnitType::Speeder => &self.speeder,
        }
    }
}

/// The (grade, type) → stats mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    /// Per-grade base stats.
    pub grades: GradeTable,
    /// Per-type modifiers.
    pub types: TypeTable,
}

const fn row(
    size: (f64, f64),
    speed: f64,
    damage: u32,
    range: f64,
    cooldown: f64,
    hp: u32,
    cost: u32,
) -> BaseStats {
    BaseStats {
        width: size.0,
        height: size.1,
        speed,
        damage,
        range,
        cooldown,
        hp,
        cost,
    }
}

impl Default for StatTable {
    fn default() -> Self {
        Self {
            grades: GradeTable {
                common: row((40.0, 60.0), 50.0, 20, 30.0, 1.0, 100, 2),
                rare: row((50.0, 70.0), 40.0, 40, 40.0, 1.2, 200, 4),
                epic: row((60.0, 80.0), 35.0, 60, 50.0, 1.5, 350, 6),
                super_epic: row((65.0, 85.0), 33.0, 80, 55.0, 1.7, 450, 8),
                mystic: row((68.0, 88.0), 32.0, 100, 60.0, 1.8, 550, 10),
                legendary: row((70.0, 90.0), 30.0, 120, 65.0, 2.0, 650, 12),
                hero: row((75.0, 95.0), 28.0, 150, 70.0, 2.2, 800, 15),
            },
            types: TypeTable {
                attacker: TypeModifiers {
                    damage_mul: 1.5,
                    hp_mul: 0.8,
                    speed_mul: 1.0,
                },
                defender: TypeModifiers {
                    damage_mul: 0.8,
                    hp_mul: 1.5,
                    speed_mul: 0.8,
                },
                speeder: TypeModifiers {
                    damage_mul: 0.7,
                    hp_mul: 0.6,
                    speed_mul: 1.8,
                },
            },
        }
    }
}

/// Scale an integer stat and floor it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_floor(value: u32, mul: f64) -> u32 {
    (f64::from(value) * mul).floor().max(0.0) as u32
}

impl StatTable {
    /// Base stats for a grade.
    #[must_use]
    pub const fn base_stats(&self, grade: Grade) -> &BaseStats {
        self.grades.get(grade)
    }

    /// Modifiers for a unit type.
    #[must_use]
    pub const fn modifiers(&self, unit_type: UnitType) -> &TypeModifiers {
        self.types.get(unit_type)
    }

    /// Spawn cost of a grade. Type does not affect cost.
    #[must_use]
    pub const fn cost(&self, grade: Grade) -> u32 {
        self.grades.get(grade).cost
    }

    /// Final stats for a grade and type.
    ///
    /// hp and damage are floored to integers; speed keeps its fraction.
    #[must_use]
    pub fn derive(&self, grade: Grade, unit_type: UnitType) -> UnitStats {
        let base = self.base_stats(grade);
        let m = self.modifiers(unit_type);
        UnitStats {
            width: base.width,
            height: base.height,
            speed: base.speed * m.speed_mul,
            damage: scale_floor(base.damage, m.damage_mul),
            range: base.range,
            cooldown: base.cooldown,
            hp: scale_floor(base.hp, m.hp_mul),
            cost: base.cost,
        }
    }

    /// Derive stats from raw names, applying the documented fallbacks.
    #[must_use]
    pub fn derive_by_name(&self, grade: &str, unit_type: &str) -> UnitStats {
        self.derive(Grade::from_name(grade), UnitType::from_name(unit_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs_strictly_increase() {
        let table = StatTable::default();
        for pair in Grade::ALL.windows(2) {
            assert!(table.cost(pair[0]) < table.cost(pair[1]), "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_derive_common_attacker() {
        let stats = StatTable::default().derive(Grade::Common, UnitType::Attacker);
        assert_eq!(stats.hp, 80);
        assert_eq!(stats.damage, 30);
        assert!((stats.speed - 50.0).abs() < 1e-9);
        assert_eq!(stats.cost, 2);
    }

    #[test]
    fn test_derive_keeps_fractional_speed() {
        let stats = StatTable::default().derive(Grade::Hero, UnitType::Speeder);
        assert_eq!(stats.hp, 480);
        assert_eq!(stats.damage, 105);
        assert!((stats.speed - 50.4).abs() < 1e-9);
    }

    #[test]
    fn test_defender_favours_hp() {
        let table = StatTable::default();
        let defender = table.derive(Grade::Epic, UnitType::Defender);
        let attacker = table.derive(Grade::Epic, UnitType::Attacker);
        assert!(defender.hp > attacker.hp);
        assert!(defender.damage < attacker.damage);
        assert_eq!(defender.hp, 525);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let table = StatTable::default();
        assert_eq!(Grade::from_name("mythic-plus"), Grade::Common);
        assert_eq!(UnitType::from_name("healer"), UnitType::Attacker);
        assert_eq!(
            table.derive_by_name("???", "???"),
            table.derive(Grade::Common, UnitType::Attacker)
        );
    }

    #[test]
    fn test_legacy_legend_name() {
        assert_eq!(Grade::from_name("legend"), Grade::Legendary);
        assert_eq!(Grade::from_name(" Super_Epic "), Grade::SuperEpic);
    }

    #[test]
    fn test_names_round_trip() {
        for grade in Grade::ALL {
            assert_eq!(Grade::from_name(grade.name()), grade);
        }
        for unit_type in UnitType::ALL {
            assert_eq!(UnitType::from_name(unit_type.name()), unit_type);
        }
    }

    #[test]
    fn test_serde_names_degrade_instead_of_failing() {
        let grade: Grade = serde_json::from_str("\"mythic_plus\"").unwrap();
        assert_eq!(grade, Grade::Common);
        let grade: Grade = serde_json::from_str("\"legend\"").unwrap();
        assert_eq!(grade, Grade::Legendary);
        let unit_type: UnitType = serde_json::from_str("\"healer\"").unwrap();
        assert_eq!(unit_type, UnitType::Attacker);
        assert_eq!(serde_json::to_string(&Grade::SuperEpic).unwrap(), "\"super_epic\"");
    }
}
