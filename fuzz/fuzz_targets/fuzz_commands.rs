#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tankwars::game::invariants::{check_invariants, check_transition};
use tankwars::{Command, MatchConfig, TankWars};

/// Structured input for command sequence fuzzing.
#[derive(Arbitrary, Debug)]
struct CommandInput {
    /// Match seed.
    seed: u64,
    /// Number of tanks (capped).
    tanks: u8,
    /// Map width (capped).
    width: u8,
    /// Map height (capped).
    height: u8,
    /// Damage overrides.
    wall_damage: Option<u32>,
    tank_damage: Option<u32>,
    tank_strength: Option<u32>,
    wall_strength: Option<u32>,
    /// (tank index, forward?) pairs.
    commands: Vec<(u8, bool)>,
}

fuzz_target!(|input: CommandInput| {
    // Cap inputs to keep runs fast
    let config = MatchConfig {
        wall_damage: input.wall_damage,
        tank_damage: input.tank_damage,
        tank_strength: input.tank_strength,
        wall_strength: input.wall_strength,
        ..MatchConfig::new(
            usize::from(input.tanks % 16),
            u16::from(input.width % 48),
            u16::from(input.height % 48),
        )
    };

    let mut engine = TankWars::seeded(input.seed);
    if engine.new_match(&config).is_err() {
        return; // Invalid or overcrowded setups are rejected, not fuzzed
    }

    for (tank, forward) in input.commands.into_iter().take(512) {
        let before = engine.map().unwrap().clone();
        let index = usize::from(tank);
        let command = if forward { Command::Forward } else { Command::Reverse };

        match engine.execute_command(index, command) {
            Ok(()) => {
                let after = engine.map().unwrap();
                let violations = check_invariants(after);
                assert!(violations.is_empty(), "invariants: {violations:?}");
                let violations = check_transition(&before, after, index);
                assert!(violations.is_empty(), "transition: {violations:?}");
            }
            Err(_) => {
                assert!(index >= before.tanks().len());
                assert_eq!(engine.map().unwrap(), &before);
            }
        }
    }
});
