//! Energy economy: regeneration, spawn cost gating and field capacity.
//!
//! Each team has one energy pool that regenerates continuously up to a cap.
//! When little time remains, both pools switch to a faster boost rate.
//! Spawning debits the pool and occupies a field slot; a slot is released
//! exactly once, when the owning unit's death is reported.

use crate::game::Team;

/// Energy tuning for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRates {
    /// Starting energy for both pools.
    pub initial: f64,
    /// Pool cap.
    pub max: f64,
    /// Energy per second during normal play.
    pub regen_rate: f64,
    /// Energy per second once the boost window opens.
    pub boost_rate: f64,
    /// Remaining seconds at or below which the boost rate applies.
    pub boost_threshold: f64,
}

/// Why a spawn was or was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Energy debited and a field slot taken.
    Admitted,
    /// Not enough energy. Checked before field capacity.
    InsufficientEnergy,
    /// The team already fields the maximum number of units.
    FieldFull,
}

/// Energy pools and field counters for both teams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Economy {
    rates: EnergyRates,
    energy: [f64; 2],
    field: [u32; 2],
    field_cap: u32,
}

impl Economy {
    /// Create an economy with both pools at the initial value.
    #[must_use]
    pub fn new(rates: EnergyRates, field_cap: u32) -> Self {
        let initial = rates.initial.clamp(0.0, rates.max);
        Self {
            rates,
            energy: [initial; 2],
            field: [0; 2],
            field_cap,
        }
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn rates(&self) -> &EnergyRates {
        &self.rates
    }

    /// Current energy of a team.
    #[must_use]
    pub const fn energy(&self, team: Team) -> f64 {
        self.energy[team.index()]
    }

    /// Live units a team fields.
    #[must_use]
    pub const fn field_count(&self, team: Team) -> u32 {
        self.field[team.index()]
    }

    /// Maximum live units per team.
    #[must_use]
    pub const fn field_cap(&self) -> u32 {
        self.field_cap
    }

    /// Rate in effect with `remaining` seconds left on the clock.
    #[must_use]
    pub fn current_rate(&self, remaining: f64) -> f64 {
        if remaining <= self.rates.boost_threshold {
            self.rates.boost_rate
        } else {
            self.rates.regen_rate
        }
    }

    /// Add `rate * dt` to both pools, clamped at the cap.
    pub fn regenerate(&mut self, dt: f64, remaining: f64) {
        let gain = self.current_rate(remaining) * dt.max(0.0);
        for pool in &mut self.energy {
            *pool = (*pool + gain).min(self.rates.max);
        }
    }

    /// Whether a team could pay `cost` right now.
    #[must_use]
    pub fn can_afford(&self, team: Team, cost: u32) -> bool {
        self.energy(team) >= f64::from(cost)
    }

    /// Try to pay for a spawn and reserve a field slot.
    pub fn admit(&mut self, team: Team, cost: u32) -> Admission {
        if !self.can_afford(team, cost) {
            return Admission::InsufficientEnergy;
        }
        let i = team.index();
        if self.field[i] >= self.field_cap {
            return Admission::FieldFull;
        }
        self.energy[i] -= f64::from(cost);
        self.field[i] += 1;
        Admission::Admitted
    }

    /// Release a field slot after a death report.
    pub fn on_unit_death(&mut self, team: Team) {
        let slot = &mut self.field[team.index()];
        *slot = slot.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> EnergyRates {
        EnergyRates {
            initial: 10.0,
            max: 100.0,
            regen_rate: 1.0,
            boost_rate: 2.0,
            boost_threshold: 30.0,
        }
    }

    #[test]
    fn test_regen_five_seconds() {
        let mut eco = Economy::new(rates(), 7);
        for _ in 0..50 {
            eco.regenerate(0.1, 100.0);
        }
        assert!((eco.energy(Team::Player) - 15.0).abs() < 1e-9);
        assert!((eco.energy(Team::Ai) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_regen_clamps_at_max() {
        let mut eco = Economy::new(rates(), 7);
        eco.regenerate(1000.0, 100.0);
        assert!((eco.energy(Team::Player) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boost_window() {
        let eco = Economy::new(rates(), 7);
        assert!((eco.current_rate(30.1) - 1.0).abs() < f64::EPSILON);
        assert!((eco.current_rate(30.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_cap_blocks_until_death() {
        let mut r = rates();
        r.initial = 100.0;
        let mut eco = Economy::new(r, 2);
        assert_eq!(eco.admit(Team::Player, 2), Admission::Admitted);
        assert_eq!(eco.admit(Team::Player, 2), Admission::Admitted);
        assert_eq!(eco.admit(Team::Player, 2), Admission::FieldFull);
        assert!((eco.energy(Team::Player) - 96.0).abs() < f64::EPSILON);
        eco.on_unit_death(Team::Player);
        assert_eq!(eco.admit(Team::Player, 2), Admission::Admitted);
        // The other team is unaffected.
        assert_eq!(eco.field_count(Team::Ai), 0);
    }

    #[test]
    fn test_energy_checked_before_capacity() {
        let mut eco = Economy::new(rates(), 0);
        assert_eq!(eco.admit(Team::Ai, 50), Admission::InsufficientEnergy);
        assert_eq!(eco.admit(Team::Ai, 5), Admission::FieldFull);
    }

    #[test]
    fn test_death_never_underflows() {
        let mut eco = Economy::new(rates(), 7);
        eco.on_unit_death(Team::Player);
        assert_eq!(eco.field_count(Team::Player), 0);
    }
}
