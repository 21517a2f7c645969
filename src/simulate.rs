//! Seeded match simulation.
//!
//! Provides a pure function interface: `(seed, config) -> MatchResult`
//!
//! Each turn every surviving tank, in index order, issues one command drawn
//! from a command RNG derived from the seed. A match ends once at most one
//! tank is left or the turn limit is reached.

use tracing::debug;

use crate::engine::{MatchConfig, TankWars};
use crate::error::{EngineError, EngineResult};
use crate::game::{Command, MatchState, TankIndex};
use crate::random::{Randomizer, SeededRandomizer};
use crate::replay::{Recorder, Recording};

/// Chance that a simulated tank drives forward rather than in reverse.
pub const FORWARD_BIAS: f64 = 0.75;

/// Mixed into the match seed so command draws don't mirror setup draws.
const COMMAND_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for simulated matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Setup of every match.
    pub setup: MatchConfig,
    /// Maximum turns before a match is called.
    pub max_turns: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            setup: MatchConfig::default(),
            max_turns: 500,
        }
    }
}

/// Final result of a simulated match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The seed used for this match.
    pub seed: u64,
    /// Total turns played.
    pub turns_played: u32,
    /// Total commands executed.
    pub commands_issued: u64,
    /// Tanks with strength left at the end.
    pub survivors: usize,
    /// The last tank standing (None if several survive or none do).
    pub winner: Option<TankIndex>,
    /// Walls knocked down during the match.
    pub walls_destroyed: usize,
    /// State at the end of the match.
    pub final_state: MatchState,
}

/// Run a complete simulated match.
///
/// # Errors
///
/// Returns an error if the match cannot be set up from `config.setup`.
pub fn run_match(seed: u64, config: &SimulationConfig) -> EngineResult<MatchResult> {
    let mut engine = TankWars::seeded(seed);
    play(&mut engine, seed, config)
}

/// Run a simulated match and keep its recording.
///
/// # Errors
///
/// Returns an error if the match cannot be set up from `config.setup`.
pub fn run_match_recorded(
    seed: u64,
    config: &SimulationConfig,
) -> EngineResult<(MatchResult, Recording)> {
    let mut engine = TankWars::seeded(seed);
    let recorder = Recorder::attach(&mut engine);
    let result = play(&mut engine, seed, config)?;

    let mut recording = recorder
        .recording()
        .unwrap_or_else(|| Recording::new(result.final_state.clone()));
    recording.seed = Some(seed);
    Ok((result, recording))
}

fn play(
    engine: &mut TankWars,
    seed: u64,
    config: &SimulationConfig,
) -> EngineResult<MatchResult> {
    let initial_walls = engine.new_match(&config.setup)?.walls().len();
    let tank_count = config.setup.num_tanks;
    let mut commands = SeededRandomizer::new(seed ^ COMMAND_STREAM);

    let mut turns_played = 0;
    let mut commands_issued = 0u64;
    while turns_played < config.max_turns && !is_decided(engine) {
        for index in 0..tank_count {
            let alive = engine
                .map()
                .and_then(|state| state.tank(index))
                .is_some_and(|tank| !tank.is_destroyed());
            if !alive {
                continue;
            }
            let command = if commands.random() < FORWARD_BIAS {
                Command::Forward
            } else {
                Command::Reverse
            };
            engine.execute_command(index, command)?;
            commands_issued += 1;
        }
        turns_played += 1;
    }

    let final_state = engine.map().cloned().ok_or(EngineError::NoMatch)?;
    let survivors = final_state.surviving_count();
    let winner = if survivors == 1 {
        final_state.surviving_tanks().next()
    } else {
        None
    };
    let walls_destroyed = initial_walls.saturating_sub(final_state.walls().len());

    debug!(seed, turns_played, survivors, ?winner, "simulated match finished");
    Ok(MatchResult {
        seed,
        turns_played,
        commands_issued,
        survivors,
        winner,
        walls_destroyed,
        final_state,
    })
}

fn is_decided(engine: &TankWars) -> bool {
    engine.map().is_none_or(|state| state.surviving_count() <= 1)
}
