#![no_main]

use arbitrary::Arbitrary;
use rampart::game::{Admission, Economy, EnergyRates};
use rampart::Team;
use libfuzzer_sys::fuzz_target;

/// One economy operation.
#[derive(Arbitrary, Debug)]
enum Step {
    /// Regenerate for `dt` hundredths of a second with `remaining` seconds left.
    Regen { dt: u8, remaining: u8 },
    /// Try to admit a unit of the given cost.
    Admit { ai: bool, cost: u8 },
    /// A unit of the team died.
    Death { ai: bool },
}

/// Structured input for economy fuzzing.
#[derive(Arbitrary, Debug)]
struct EconomyInput {
    initial: u8,
    max: u8,
    field_cap: u8,
    steps: Vec<Step>,
}

fn team(ai: bool) -> Team {
    if ai { Team::Ai } else { Team::Player }
}

fuzz_target!(|input: EconomyInput| {
    let max = f64::from(input.max.max(1));
    let rates = EnergyRates {
        initial: f64::from(input.initial),
        max,
        regen_rate: 1.0,
        boost_rate: 2.0,
        boost_threshold: 30.0,
    };
    let cap = u32::from(input.field_cap.max(1));
    let mut economy = Economy::new(rates, cap);

    for step in input.steps.iter().take(1000) {
        match *step {
            Step::Regen { dt, remaining } => {
                economy.regenerate(f64::from(dt) / 100.0, f64::from(remaining));
            }
            Step::Admit { ai, cost } => {
                let team = team(ai);
                let before = economy.energy(team);
                let count = economy.field_count(team);
                match economy.admit(team, u32::from(cost)) {
                    Admission::Admitted => {
                        assert!((before - economy.energy(team) - f64::from(cost)).abs() < 1e-9);
                        assert_eq!(economy.field_count(team), count + 1);
                    }
                    Admission::InsufficientEnergy | Admission::FieldFull => {
                        assert!((before - economy.energy(team)).abs() < f64::EPSILON);
                        assert_eq!(economy.field_count(team), count);
                    }
                }
            }
            Step::Death { ai } => economy.on_unit_death(team(ai)),
        }

        for team in Team::ALL {
            let energy = economy.energy(team);
            assert!(energy >= 0.0 && energy <= max + 1e-9, "energy {energy} out of range");
            assert!(economy.field_count(team) <= cap);
        }
    }
});
