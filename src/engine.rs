//! Match engine: setup, command execution and notification.
//!
//! [`TankWars`] owns one match at a time together with the randomness and
//! maze capabilities used to build it and the listeners observing it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::game::{
    Command, Coord, DamageRules, DEFAULT_TANK_STRENGTH, DEFAULT_WALL_STRENGTH, Direction,
    EventKind, MatchEvent, MatchState, Notifier, Tank, TankIndex, Wall, invariants,
    resolve_command,
};
use crate::maze::{MazeBuilder, ScatterMaze};
use crate::random::{Randomizer, SeededRandomizer};

/// Mixed into the seed so wall placement and spawn shuffles draw from
/// different streams.
const MAZE_STREAM: u64 = 0xD1B5_4A32_D192_ED03;

/// Configuration for a new match.
///
/// Deserializes from JSON with `camelCase` keys; every field but the tank
/// count and map size may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    /// Number of tanks to place.
    pub num_tanks: usize,
    /// Map width in cells.
    pub map_width: u16,
    /// Map height in cells.
    pub map_height: u16,
    /// Damage a wall deals to a tank (default 10).
    #[serde(default)]
    pub wall_damage: Option<u32>,
    /// Damage a tank deals in collisions (default 20).
    #[serde(default)]
    pub tank_damage: Option<u32>,
    /// Starting tank strength (default 100).
    #[serde(default)]
    pub tank_strength: Option<u32>,
    /// Starting wall strength (default 100).
    #[serde(default)]
    pub wall_strength: Option<u32>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(4, 24, 12)
    }
}

impl MatchConfig {
    /// Config with default damage and strength values.
    #[must_use]
    pub const fn new(num_tanks: usize, map_width: u16, map_height: u16) -> Self {
        Self {
            num_tanks,
            map_width,
            map_height,
            wall_damage: None,
            tank_damage: None,
            tank_strength: None,
            wall_strength: None,
        }
    }

    /// Damage constants with defaults applied.
    #[must_use]
    pub fn rules(&self) -> DamageRules {
        let defaults = DamageRules::default();
        DamageRules {
            wall_damage: self.wall_damage.unwrap_or(defaults.wall_damage),
            tank_damage: self.tank_damage.unwrap_or(defaults.tank_damage),
        }
    }

    /// Check the config before building anything from it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for zero tanks, a zero
    /// dimension or a zero wall strength.
    pub fn validate(&self) -> EngineResult<()> {
        if self.num_tanks == 0 {
            return Err(EngineError::InvalidConfig(
                "a match needs at least one tank".to_string(),
            ));
        }
        if self.map_width == 0 || self.map_height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "map must be at least 1x1, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.wall_strength == Some(0) {
            return Err(EngineError::InvalidConfig(
                "walls must start with a positive strength".to_string(),
            ));
        }
        Ok(())
    }
}

/// The match engine.
///
/// Not thread-safe by construction: run one engine per worker.
#[derive(Debug)]
pub struct TankWars<R = SeededRandomizer, M = ScatterMaze> {
    randomizer: R,
    maze_builder: M,
    state: Option<MatchState>,
    notifier: Notifier,
}

impl TankWars<SeededRandomizer, ScatterMaze> {
    /// Engine whose randomness and walls derive from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(
            SeededRandomizer::new(seed),
            ScatterMaze::new(seed ^ MAZE_STREAM),
        )
    }

    /// Engine resuming a fully specified state, as used by tests and replays.
    #[must_use]
    pub fn from_state(state: MatchState) -> Self {
        let mut engine = Self::seeded(0);
        engine.state = Some(state);
        engine
    }
}

impl<R: Randomizer, M: MazeBuilder> TankWars<R, M> {
    /// Create an engine with no match in progress.
    #[must_use]
    pub fn new(randomizer: R, maze_builder: M) -> Self {
        Self {
            randomizer,
            maze_builder,
            state: None,
            notifier: Notifier::new(),
        }
    }

    /// Register a listener for `kind` events.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&MatchEvent<'_>) + 'static) {
        self.notifier.on(kind, listener);
    }

    /// Current match state, or `None` before the first match.
    #[must_use]
    pub fn map(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    /// Build a new match, replacing any previous one, and publish `newMatch`.
    ///
    /// Walls come from the maze builder. Empty cells are collected in
    /// column-major order and shuffled; tanks spawn on the last
    /// `num_tanks` cells of the shuffled deck, in deck order. Each tank
    /// then faces the top card of a reshuffled direction deck.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for an invalid config,
    /// [`EngineError::InvalidLayout`] if the maze builder returns cells
    /// outside the map or duplicates, and [`EngineError::NotEnoughSpace`]
    /// when the map has fewer empty cells than tanks. The previous match
    /// is kept on error.
    pub fn new_match(&mut self, config: &MatchConfig) -> EngineResult<&MatchState> {
        config.validate()?;
        let (width, height) = (config.map_width, config.map_height);

        let wall_strength = config.wall_strength.unwrap_or(DEFAULT_WALL_STRENGTH);
        let walls: Vec<Wall> = self
            .maze_builder
            .build(width, height)
            .into_iter()
            .map(|pos| Wall::new(pos, wall_strength))
            .collect();

        let wall_cells: HashSet<Coord> = walls.iter().map(Wall::position).collect();
        let candidates: Vec<Coord> = Coord::column_major(width, height)
            .filter(|pos| !wall_cells.contains(pos))
            .collect();

        let not_enough = EngineError::NotEnoughSpace {
            requested: config.num_tanks,
            available: candidates.len(),
        };
        if config.num_tanks > candidates.len() {
            return Err(not_enough);
        }

        let deck = self.randomizer.shuffle(&candidates);
        let first_spawn = deck.len().checked_sub(config.num_tanks).ok_or(not_enough)?;

        let strength = config.tank_strength.unwrap_or(DEFAULT_TANK_STRENGTH);
        let mut facings = Direction::DECK.to_vec();
        let mut tanks = Vec::with_capacity(config.num_tanks);
        for &pos in &deck[first_spawn..] {
            facings = self.randomizer.shuffle(&facings);
            let facing = facings.first().copied().ok_or_else(|| {
                EngineError::InvalidLayout("empty direction deck from randomizer".to_string())
            })?;
            tanks.push(Tank::new(pos, facing, strength));
        }

        let state = MatchState::new(width, height, tanks, walls, config.rules())?;
        info!(
            tanks = state.tanks().len(),
            walls = state.walls().len(),
            width,
            height,
            "new match"
        );

        let state = self.state.insert(state);
        self.notifier.emit(&MatchEvent::NewMatch(state));
        Ok(&*state)
    }

    /// Apply `command` to the tank at `index`.
    ///
    /// The resulting state is observed through [`TankWars::map`]; a
    /// `commandExecuted` event is published afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoMatch`] before the first match and
    /// [`EngineError::InvalidTankIndex`] for an out-of-range index.
    pub fn execute_command(&mut self, index: TankIndex, command: Command) -> EngineResult<()> {
        let state = self.state.as_mut().ok_or(EngineError::NoMatch)?;
        let outcome = resolve_command(state, index, command)?;
        invariants::assert_invariants(state);

        self.notifier.emit(&MatchEvent::CommandExecuted {
            tank: index,
            command,
            outcome,
            state: &*state,
        });
        Ok(())
    }

    /// Apply a command given by name (`forward` or `reverse`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCommand`] for any other name, plus the
    /// errors of [`TankWars::execute_command`].
    pub fn execute_named(&mut self, index: TankIndex, name: &str) -> EngineResult<()> {
        let command: Command = name.parse()?;
        self.execute_command(index, command)
    }
}
