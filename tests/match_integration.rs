//! Whole-match integration tests.
//!
//! These drive `MatchController` and the batch runner through complete
//! matches and check the rules that only show up over many ticks.
//!
//! Run with: cargo test --release match_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use rampart::batch::{BatchConfig, run_batch, run_match, run_match_with};
use rampart::game::invariants::check_invariants;
use rampart::game::{ArrivalPolicy, CollisionMode, DamageResult, Damageable, EntityId};
use rampart::{
    Difficulty, Grade, MatchConfig, MatchController, MatchEvent, MatchPhase, Outcome,
    SpawnOutcome, TargetRef, Team, UnitType,
};

const DT: f64 = 1.0 / 60.0;

/// A config where nothing acts on its own.
fn quiet_config() -> MatchConfig {
    let mut config = MatchConfig::default();
    for difficulty in Difficulty::ALL {
        config.difficulties.get_mut(difficulty).spawn_period = 10_000.0;
    }
    config.castle.attack_period = 10_000.0;
    config
}

fn started(config: MatchConfig, difficulty: Difficulty, seed: u64) -> MatchController {
    let mut game = MatchController::new(config, difficulty, seed);
    game.start();
    game
}

fn run_for(game: &mut MatchController, seconds: f64) {
    let ticks = (seconds / DT).round() as u64;
    for _ in 0..ticks {
        game.tick(DT);
    }
}

/// Spawn two identical AI units side by side.
fn ai_pair(game: &mut MatchController) -> [EntityId; 2] {
    [0, 1].map(|_| {
        game.try_spawn(Team::Ai, Grade::Common, UnitType::Defender)
            .spawned()
            .unwrap()
    })
}

/// Tick until the first castle volley, kill its target while the shot is in
/// flight, and return the dead target with what the landing struck.
fn kill_target_in_flight(game: &mut MatchController) -> (EntityId, Option<TargetRef>) {
    let mut shot: Option<(EntityId, EntityId)> = None;
    for _ in 0..(30.0 / DT) as u64 {
        game.tick(DT);
        for event in game.drain_events() {
            match event {
                MatchEvent::ProjectileFired { id, target, .. } if shot.is_none() => {
                    assert_eq!(
                        game.apply_damage(TargetRef::Unit(target), 100_000),
                        DamageResult::Killed
                    );
                    shot = Some((id, target));
                }
                MatchEvent::ProjectileLanded { id, struck }
                    if shot.is_some_and(|(fired, _)| fired == id) =>
                {
                    return (shot.unwrap().1, struck);
                }
                _ => {}
            }
        }
    }
    panic!("no volley landed within 30 s");
}

fn game_overs(events: &[MatchEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, MatchEvent::GameOver(_)))
        .count()
}

#[test]
fn test_full_match_ends_exactly_once() {
    for difficulty in Difficulty::ALL {
        let mut game = MatchController::new(MatchConfig::default(), difficulty, 7)
            .with_player_autopilot(Difficulty::Normal);
        game.start();
        let mut events = Vec::new();
        for _ in 0..(200.0 / DT) as u64 {
            game.tick(DT);
            events.extend(game.drain_events());
            assert!(
                check_invariants(&game).is_empty(),
                "{:?}",
                check_invariants(&game)
            );
        }
        assert!(game.is_over());
        assert_eq!(game_overs(&events), 1, "difficulty {difficulty}");
        assert!(matches!(events.last(), Some(MatchEvent::GameOver(_))));
    }
}

#[test]
fn test_untouched_match_times_out_at_total_time() {
    let mut game = started(quiet_config(), Difficulty::Normal, 1);
    run_for(&mut game, 179.5);
    assert_eq!(game.phase(), MatchPhase::Running);
    run_for(&mut game, 1.0);

    let summary = game.summary().unwrap();
    assert_eq!(summary.outcome, Outcome::TimeUp);
    assert_eq!(summary.player_hp, 1000);
    assert_eq!(summary.ai_hp, 1000);
    assert_eq!(game.remaining_time(), 0.0);
    assert!((game.elapsed() - 180.0).abs() <= DT);
}

#[test]
fn test_ticks_after_game_over_change_nothing() {
    let mut game = started(quiet_config(), Difficulty::Easy, 2);
    let _ = game.apply_damage(TargetRef::Castle(Team::Ai), 1000);
    game.tick(DT);
    assert_eq!(game.summary().unwrap().outcome, Outcome::Winner(Team::Player));

    let before = game.snapshot();
    let events = game.events().len();
    let energy = Team::ALL.map(|team| game.economy().energy(team));
    run_for(&mut game, 5.0);
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.events().len(), events);
    assert_eq!(Team::ALL.map(|team| game.economy().energy(team)), energy);
    assert_eq!(
        game.try_spawn(Team::Player, Grade::Common, UnitType::Attacker),
        SpawnOutcome::NotRunning
    );
}

#[test]
fn test_field_cap_blocks_and_reopens() {
    let mut config = quiet_config();
    config.energy.initial = 40.0;
    let mut game = started(config, Difficulty::Normal, 3);

    let ids: Vec<_> = (0..7)
        .map(|_| {
            game.try_spawn(Team::Player, Grade::Common, UnitType::Defender)
                .spawned()
                .unwrap()
        })
        .collect();
    assert_eq!(game.economy().field_count(Team::Player), 7);

    let energy = game.economy().energy(Team::Player);
    assert_eq!(
        game.try_spawn(Team::Player, Grade::Common, UnitType::Defender),
        SpawnOutcome::FieldFull
    );
    assert_eq!(game.economy().energy(Team::Player), energy);

    assert_eq!(
        game.apply_damage(TargetRef::Unit(ids[3]), 10_000),
        DamageResult::Killed
    );
    assert_eq!(game.economy().field_count(Team::Player), 6);
    assert!(
        game.try_spawn(Team::Player, Grade::Common, UnitType::Defender)
            .spawned()
            .is_some()
    );

    // The AI pool is capped separately.
    assert!(
        game.try_spawn(Team::Ai, Grade::Common, UnitType::Defender)
            .spawned()
            .is_some()
    );
}

#[test]
fn test_energy_checked_before_field_cap() {
    let mut config = quiet_config();
    config.energy.initial = 14.0;
    let mut game = started(config, Difficulty::Normal, 4);
    for _ in 0..7 {
        assert!(
            game.try_spawn(Team::Player, Grade::Common, UnitType::Speeder)
                .spawned()
                .is_some()
        );
    }
    assert_eq!(
        game.try_spawn(Team::Player, Grade::Hero, UnitType::Speeder),
        SpawnOutcome::InsufficientEnergy
    );
}

#[test]
fn test_energy_regenerates_and_caps() {
    let mut game = started(quiet_config(), Difficulty::Easy, 5);
    run_for(&mut game, 5.0);
    let energy = game.economy().energy(Team::Player);
    assert!((energy - 15.0).abs() < 0.2, "energy {energy}");

    run_for(&mut game, 60.0);
    assert_eq!(game.economy().energy(Team::Player), 30.0);
    assert_eq!(game.economy().energy(Team::Ai), 30.0);
}

#[test]
fn test_energy_boost_in_final_stretch() {
    let mut config = quiet_config();
    config.total_time = 40.0;
    config.energy.initial = 0.0;
    let mut game = started(config, Difficulty::Hard, 6);

    // 10 s at the base rate, then 5 s boosted.
    run_for(&mut game, 15.0);
    let energy = game.economy().energy(Team::Player);
    assert!((energy - 20.0).abs() < 0.3, "energy {energy}");
}

#[test]
fn test_opposing_units_meet_and_fight() {
    let mut game = started(quiet_config(), Difficulty::Normal, 8);
    let player = game
        .try_spawn(Team::Player, Grade::Common, UnitType::Attacker)
        .spawned()
        .unwrap();
    let ai = game
        .try_spawn(Team::Ai, Grade::Common, UnitType::Attacker)
        .spawned()
        .unwrap();

    let mut deaths = Vec::new();
    for _ in 0..(30.0 / DT) as u64 {
        game.tick(DT);
        for event in game.drain_events() {
            if let MatchEvent::UnitDied { id, .. } = event {
                deaths.push(id);
            }
        }
        assert!(check_invariants(&game).is_empty());
    }

    assert!(!deaths.is_empty());
    assert!(deaths.iter().all(|id| *id == player || *id == ai));
    let mut unique = deaths.clone();
    unique.dedup();
    assert_eq!(unique.len(), deaths.len());
}

#[test]
fn test_unit_reaches_and_damages_enemy_castle() {
    let mut game = started(quiet_config(), Difficulty::Normal, 9);
    let _ = game.try_spawn(Team::Player, Grade::Common, UnitType::Speeder);
    run_for(&mut game, 30.0);
    assert!(game.castle(Team::Ai).hp() < 1000);
    assert!(
        game.events()
            .iter()
            .any(|e| matches!(e, MatchEvent::CastleDamaged { team: Team::Ai, .. }))
    );
}

#[test]
fn test_castle_volley_lands_on_unit() {
    let mut config = quiet_config();
    config.castle.attack_period = 1.5;
    let mut game = started(config, Difficulty::Normal, 10);
    let id = game
        .try_spawn(Team::Ai, Grade::Rare, UnitType::Defender)
        .spawned()
        .unwrap();
    let full = game.unit(id).unwrap().hp();
    run_for(&mut game, 25.0);

    let landed = game.events().iter().any(|e| {
        matches!(
            e,
            MatchEvent::ProjectileLanded {
                struck: Some(TargetRef::Unit(struck)),
                ..
            } if *struck == id
        )
    });
    assert!(landed);
    assert!(game.unit(id).is_none_or(|u| u.hp() < full));
}

#[test]
fn test_original_target_shot_is_absorbed_when_target_dies() {
    let mut config = quiet_config();
    config.castle.attack_period = 1.5;
    let mut game = started(config, Difficulty::Normal, 14);
    let pair = ai_pair(&mut game);
    let full = game.unit(pair[0]).unwrap().hp();

    let (dead, struck) = kill_target_in_flight(&mut game);
    assert_eq!(struck, None);
    let survivor = pair.into_iter().find(|&id| id != dead).unwrap();
    assert_eq!(game.unit(survivor).unwrap().hp(), full);
    assert_eq!(game.castle(Team::Ai).hp(), 1000);
    assert_eq!(game.castle(Team::Player).hp(), 1000);
}

#[test]
fn test_nearest_to_impact_strikes_neighbour_of_dead_target() {
    let mut config = quiet_config();
    config.castle.attack_period = 1.5;
    config.projectile.arrival = ArrivalPolicy::NearestToImpact { radius: 150.0 };
    let mut game = started(config, Difficulty::Normal, 15);
    let pair = ai_pair(&mut game);
    let full = game.unit(pair[0]).unwrap().hp();

    let (dead, struck) = kill_target_in_flight(&mut game);
    let survivor = pair.into_iter().find(|&id| id != dead).unwrap();
    assert_eq!(struck, Some(TargetRef::Unit(survivor)));
    assert_eq!(game.unit(survivor).unwrap().hp(), full - 20);
}

#[test]
fn test_nearest_to_impact_misses_outside_radius() {
    let mut config = quiet_config();
    config.castle.attack_period = 1.5;
    // The survivor marches tens of pixels past the captured point in flight.
    config.projectile.arrival = ArrivalPolicy::NearestToImpact { radius: 5.0 };
    let mut game = started(config, Difficulty::Normal, 16);
    let pair = ai_pair(&mut game);
    let full = game.unit(pair[0]).unwrap().hp();

    let (dead, struck) = kill_target_in_flight(&mut game);
    assert_eq!(struck, None);
    let survivor = pair.into_iter().find(|&id| id != dead).unwrap();
    assert_eq!(game.unit(survivor).unwrap().hp(), full);
}

#[test]
fn test_external_overlap_respects_cooldown() {
    let mut config = quiet_config();
    config.collisions = CollisionMode::External;
    let mut game = started(config, Difficulty::Normal, 17);
    let player = game
        .try_spawn(Team::Player, Grade::Common, UnitType::Defender)
        .spawned()
        .unwrap();
    let ai = game
        .try_spawn(Team::Ai, Grade::Common, UnitType::Defender)
        .spawned()
        .unwrap();
    let hp = |game: &MatchController| [player, ai].map(|id| game.unit(id).unwrap().hp());
    assert_eq!(hp(&game), [150, 150]);

    game.notify_overlap(player, ai);
    game.tick(0.01);
    assert_eq!(hp(&game), [134, 134]);

    // Both strikers are still cooling down.
    game.notify_overlap(player, ai);
    game.tick(0.01);
    assert_eq!(hp(&game), [134, 134]);

    // Without a report nothing touches, however long the units march.
    run_for(&mut game, 1.5);
    assert_eq!(hp(&game), [134, 134]);

    game.notify_overlap(ai, player);
    game.tick(0.01);
    assert_eq!(hp(&game), [118, 118]);
}

#[test]
fn test_nearest_to_impact_policy_runs_clean() {
    let mut config = MatchConfig::default();
    config.projectile.arrival = ArrivalPolicy::NearestToImpact { radius: 40.0 };
    let cfg = BatchConfig {
        match_config: config,
        difficulty: Difficulty::Hard,
        ..BatchConfig::default()
    };
    let result = run_match(11, &cfg);
    assert!(result.projectiles_fired > 0);
    assert!(result.elapsed <= 180.0 + 1e-9);
}

#[test]
fn test_same_seed_same_match() {
    let cfg = BatchConfig::default();
    let mut first = Vec::new();
    let a = run_match_with(42, &cfg, |t, e| first.push((t, e.clone())));
    let mut second = Vec::new();
    let b = run_match_with(42, &cfg, |t, e| second.push((t, e.clone())));
    assert_eq!(a, b);
    assert_eq!(first, second);
}

#[test]
fn test_restart_replays_seed() {
    let mut game = MatchController::new(MatchConfig::default(), Difficulty::Hard, 12)
        .with_player_autopilot(Difficulty::Hard);
    game.start();
    run_for(&mut game, 20.0);
    let first = game.snapshot();
    let deck = game.deck().clone();

    game.start();
    assert_eq!(game.events(), &[MatchEvent::Started]);
    run_for(&mut game, 20.0);
    assert_eq!(game.snapshot(), first);
    assert_eq!(game.deck(), &deck);
}

#[test]
fn test_snapshot_and_hud_track_spawns() {
    let mut game = started(quiet_config(), Difficulty::Normal, 13);
    let snap = game.snapshot();
    assert!(snap.units.is_empty());
    assert_eq!(snap.castles[0].team, Team::Player);
    assert_eq!(snap.castles[1].hp, 1000);

    let id = game
        .try_spawn(Team::Player, Grade::Epic, UnitType::Attacker)
        .spawned()
        .unwrap();
    let snap = game.snapshot();
    assert_eq!(snap.units.len(), 1);
    assert_eq!(snap.units[0].id, id);
    assert_eq!(snap.units[0].position.x, game.config().spawn_x(Team::Player));
    assert_eq!(snap.units[0].state, "moving");

    let hud = game.hud();
    assert_eq!(hud.player_energy, 4);
    assert_eq!(hud.field_count, 1);
    assert_eq!(hud.remaining_time, 180);
}

#[test]
fn test_batch_counts_every_match() {
    let mut config = MatchConfig::default();
    config.total_time = 30.0;
    let cfg = BatchConfig {
        match_config: config,
        ..BatchConfig::default()
    };
    let stats = run_batch(100, 8, &cfg).unwrap();
    assert_eq!(stats.matches, 8);
    assert_eq!(stats.player_wins + stats.ai_wins + stats.time_ups, 8);
    assert!(stats.average_duration() <= 30.0 + 1e-9);
}
