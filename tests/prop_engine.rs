//! Property-based tests for match setup and command resolution.
//!
//! Run with: cargo test --release prop_engine

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use tankwars::game::invariants::{check_invariants, check_transition};
use tankwars::game::resolve_command;
use tankwars::replay::Recorder;
use tankwars::{Command, MatchConfig, MatchState, Outcome, TankStatus, TankWars};

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![3 => Just(Command::Forward), 1 => Just(Command::Reverse)]
}

fn config_strategy() -> impl Strategy<Value = MatchConfig> {
    (1usize..5, 4u16..16, 4u16..16, 1u32..60, 1u32..60, 1u32..250, 1u32..250).prop_map(
        |(tanks, width, height, wall_damage, tank_damage, tank_strength, wall_strength)| {
            MatchConfig {
                wall_damage: Some(wall_damage),
                tank_damage: Some(tank_damage),
                tank_strength: Some(tank_strength),
                wall_strength: Some(wall_strength),
                ..MatchConfig::new(tanks, width, height)
            }
        },
    )
}

/// A seeded match plus a list of (tank, command) pairs to play on it.
fn scenario() -> impl Strategy<Value = (MatchState, Vec<(usize, Command)>)> {
    (any::<u64>(), config_strategy()).prop_flat_map(|(seed, config)| {
        let mut engine = TankWars::seeded(seed);
        let state = engine.new_match(&config).unwrap().clone();
        let commands = prop::collection::vec((0..config.num_tanks, command_strategy()), 0..60);
        (Just(state), commands)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A new match has exactly the requested tanks and dimensions.
    #[test]
    fn prop_new_match_shape(seed in any::<u64>(), config in config_strategy()) {
        let mut engine = TankWars::seeded(seed);
        let map = engine.new_match(&config).unwrap();

        prop_assert_eq!(map.tanks().len(), config.num_tanks);
        prop_assert_eq!(map.width(), config.map_width);
        prop_assert_eq!(map.height(), config.map_height);
        prop_assert!(map.tanks().iter().all(|t| t.status == TankStatus::Static));
        prop_assert!(check_invariants(map).is_empty());
    }

    /// Layout invariants and transition rules hold after every command.
    #[test]
    fn prop_commands_preserve_invariants((initial, commands) in scenario()) {
        let mut state = initial;
        for (tank, command) in commands {
            let before = state.clone();
            resolve_command(&mut state, tank, command).unwrap();

            let violations = check_invariants(&state);
            prop_assert!(violations.is_empty(), "{:?}", violations);
            let violations = check_transition(&before, &state, tank);
            prop_assert!(violations.is_empty(), "{:?}", violations);
            prop_assert!(state.walls().len() <= before.walls().len());
        }
    }

    /// Strength changes follow the outcome exactly and saturate at zero.
    #[test]
    fn prop_damage_matches_outcome((initial, commands) in scenario()) {
        let mut state = initial;
        let (wall_damage, tank_damage) = (state.wall_damage(), state.tank_damage());

        for (tank, command) in commands {
            let before = state.clone();
            let outcome = resolve_command(&mut state, tank, command).unwrap();
            let old = &before.tanks()[tank];
            let new = &state.tanks()[tank];

            match outcome {
                Outcome::Moved { from, to } => {
                    prop_assert_eq!(from, old.position());
                    prop_assert_eq!(to, new.position());
                    prop_assert_eq!(new.strength, old.strength);
                    prop_assert_eq!(new.status, TankStatus::Moving);
                }
                Outcome::HitEdge => {
                    prop_assert_eq!(new.strength, old.strength.saturating_sub(wall_damage));
                }
                Outcome::HitWall { wall, destroyed } => {
                    prop_assert_eq!(new.strength, old.strength.saturating_sub(wall_damage));
                    let hit = before.walls().iter().find(|w| w.position() == wall).unwrap();
                    prop_assert_eq!(destroyed, hit.strength <= tank_damage);
                    match state.wall_at(wall) {
                        Some(i) => prop_assert_eq!(
                            state.walls()[i].strength,
                            hit.strength - tank_damage
                        ),
                        None => prop_assert!(destroyed),
                    }
                }
                Outcome::HitTank { target } => {
                    prop_assert_eq!(new.strength, old.strength.saturating_sub(tank_damage));
                    let victim_before = before.tanks()[target].strength;
                    prop_assert_eq!(
                        state.tanks()[target].strength,
                        victim_before.saturating_sub(tank_damage)
                    );
                    prop_assert_eq!(state.tanks()[target].status, TankStatus::Bumped);
                }
            }

            if outcome.is_bump() {
                prop_assert_eq!(new.position(), old.position());
                let travel = command.heading(old.direction);
                prop_assert_eq!(new.status, TankStatus::Bump(travel));
            }
        }
    }

    /// Replaying a recording reproduces the live engine state.
    #[test]
    fn prop_recording_replays(
        seed in any::<u64>(),
        config in config_strategy(),
        picks in prop::collection::vec((any::<prop::sample::Index>(), command_strategy()), 0..40),
    ) {
        let mut engine = TankWars::seeded(seed);
        let recorder = Recorder::attach(&mut engine);
        engine.new_match(&config).unwrap();

        for (index, command) in picks {
            engine.execute_command(index.index(config.num_tanks), command).unwrap();
        }

        let recording = recorder.recording().unwrap();
        prop_assert_eq!(&recording.replay().unwrap(), engine.map().unwrap());
    }

    /// Same seed and config always produce the same match.
    #[test]
    fn prop_setup_deterministic(seed in any::<u64>(), config in config_strategy()) {
        let first = TankWars::seeded(seed).new_match(&config).unwrap().clone();
        let second = TankWars::seeded(seed).new_match(&config).unwrap().clone();
        prop_assert_eq!(first, second);
    }
}
