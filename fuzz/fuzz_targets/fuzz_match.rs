#![no_main]

use arbitrary::Arbitrary;
use rampart::game::invariants::check_invariants;
use rampart::{Difficulty, Grade, MatchConfig, MatchController, MatchEvent, TargetRef, Team, UnitType};
use libfuzzer_sys::fuzz_target;

/// One input to a running match.
#[derive(Arbitrary, Debug)]
enum Action {
    /// Advance by `ms` milliseconds.
    Tick { ms: u16 },
    /// Spawn a unit.
    Spawn { ai: bool, grade: u8, unit_type: u8 },
    /// Play a deck slot.
    Card { slot: u8 },
    /// Damage the n-th live unit.
    Hit { index: u8, amount: u16 },
    /// Damage a castle.
    Siege { ai: bool, amount: u16 },
    /// Report an overlap between two live units.
    Overlap { a: u8, b: u8 },
    /// Toggle pause.
    Pause,
    /// Restart from the same seed.
    Restart,
}

/// Structured input for whole-match fuzzing.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    seed: u64,
    difficulty: u8,
    autopilot: bool,
    actions: Vec<Action>,
}

fn unit_at(game: &MatchController, index: u8) -> Option<u32> {
    let units = game.units();
    (!units.is_empty()).then(|| units[usize::from(index) % units.len()].id)
}

fuzz_target!(|input: MatchInput| {
    let difficulty = Difficulty::ALL[usize::from(input.difficulty) % 3];
    let mut game = MatchController::new(MatchConfig::default(), difficulty, input.seed);
    if input.autopilot {
        game = game.with_player_autopilot(difficulty);
    }
    game.start();

    for action in input.actions.iter().take(2000) {
        match *action {
            Action::Tick { ms } => game.tick(f64::from(ms) / 1000.0),
            Action::Spawn { ai, grade, unit_type } => {
                let team = if ai { Team::Ai } else { Team::Player };
                let grade = Grade::ALL[usize::from(grade) % Grade::ALL.len()];
                let unit_type = UnitType::ALL[usize::from(unit_type) % UnitType::ALL.len()];
                let _ = game.try_spawn(team, grade, unit_type);
            }
            Action::Card { slot } => {
                let _ = game.try_spawn_card(usize::from(slot));
            }
            Action::Hit { index, amount } => {
                if let Some(id) = unit_at(&game, index) {
                    let _ = game.apply_damage(TargetRef::Unit(id), u32::from(amount));
                }
            }
            Action::Siege { ai, amount } => {
                let team = if ai { Team::Ai } else { Team::Player };
                let _ = game.apply_damage(TargetRef::Castle(team), u32::from(amount));
            }
            Action::Overlap { a, b } => {
                if let (Some(a), Some(b)) = (unit_at(&game, a), unit_at(&game, b)) {
                    game.notify_overlap(a, b);
                }
            }
            Action::Pause => {
                game.pause();
                game.resume();
            }
            Action::Restart => game.start(),
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "invariants violated: {violations:?}");

        let overs = game
            .events()
            .iter()
            .filter(|e| matches!(e, MatchEvent::GameOver(_)))
            .count();
        assert!(overs <= 1, "game over emitted {overs} times");
    }
});
