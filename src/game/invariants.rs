//! Match invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a correctly implemented match. They are not
//! gameplay limits; a violation always means engine state went inconsistent.

use crate::game::{Damageable, MatchController, MatchPhase, Team, UnitState};

/// Slack for floating-point energy comparisons.
const ENERGY_EPSILON: f64 = 1e-9;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check all match invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &MatchController) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let economy = state.economy();

    for team in Team::ALL {
        let castle = state.castle(team);
        if castle.hp() > castle.max_hp() {
            violations.push(violation(format!(
                "{team} castle hp {} exceeds max {}",
                castle.hp(),
                castle.max_hp()
            )));
        }

        let energy = economy.energy(team);
        let max = economy.rates().max;
        if !(-ENERGY_EPSILON..=max + ENERGY_EPSILON).contains(&energy) {
            violations.push(violation(format!(
                "{team} energy {energy} outside [0, {max}]"
            )));
        }

        let alive = state
            .units()
            .iter()
            .filter(|u| u.team() == team && !u.is_dead())
            .count();
        let counted = economy.field_count(team) as usize;
        // Dead units linger until the reap at the end of a tick, but their
        // slot is released the moment they die.
        if counted != alive {
            violations.push(violation(format!(
                "{team} field count {counted} != live units {alive}"
            )));
        }
        if economy.field_count(team) > economy.field_cap() {
            violations.push(violation(format!(
                "{team} field count {} exceeds cap {}",
                economy.field_count(team),
                economy.field_cap()
            )));
        }
    }

    for unit in state.units() {
        let dead = unit.state() == UnitState::Dead;
        if dead != (unit.hp() == 0) {
            violations.push(violation(format!(
                "unit {} has state {} with hp {}",
                unit.id,
                unit.state().name(),
                unit.hp()
            )));
        }
        if unit.hp() > unit.max_hp() {
            violations.push(violation(format!(
                "unit {} hp {} exceeds max {}",
                unit.id,
                unit.hp(),
                unit.max_hp()
            )));
        }
    }

    if state.units().windows(2).any(|w| w[0].id >= w[1].id) {
        violations.push(violation("unit arena is not sorted by id".to_string()));
    }

    for projectile in state.projectiles() {
        if projectile.traveled() > projectile.total_distance() {
            violations.push(violation(format!(
                "projectile {} traveled {} past its distance {}",
                projectile.id,
                projectile.traveled(),
                projectile.total_distance()
            )));
        }
    }

    if state.remaining_time() < 0.0 {
        violations.push(violation(format!(
            "remaining time {} is negative",
            state.remaining_time()
        )));
    }

    match (state.phase(), state.summary()) {
        (MatchPhase::Over, None) => {
            violations.push(violation("match is over without a summary".to_string()));
        }
        (MatchPhase::Pending | MatchPhase::Running | MatchPhase::Paused, Some(_)) => {
            violations.push(violation("summary exists before the match ended".to_string()));
        }
        _ => {}
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchController) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchController) {}
