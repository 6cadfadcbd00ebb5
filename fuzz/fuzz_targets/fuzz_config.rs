#![no_main]

use rampart::{Difficulty, MatchConfig, MatchController};
use libfuzzer_sys::fuzz_target;

// Any config that parses and validates must run without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut config) = MatchConfig::from_json(text) else {
        return;
    };
    // Keep runs short regardless of the configured clock.
    config.total_time = config.total_time.min(20.0);

    for difficulty in Difficulty::ALL {
        let mut game = MatchController::new(config.clone(), difficulty, 0)
            .with_player_autopilot(difficulty);
        game.start();
        for _ in 0..600 {
            game.tick(1.0 / 30.0);
        }
    }
});
