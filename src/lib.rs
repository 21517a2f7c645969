// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Tank Wars: a deterministic turn-based engine for grid tank battles.
//!
//! This crate provides:
//! - Match setup on a rectangular grid with tanks and destructible walls
//! - Command resolution (movement, bumps, damage)
//! - Synchronous event notification for observers
//! - Recording, replay and seeded simulation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Simulation / Replay / CLI         │
//! ├─────────────────────────────────────┤
//! │   TankWars engine + Notifier        │
//! ├─────────────────────────────────────┤
//! │   Game rules (map, tanks, walls)    │
//! ├─────────────────────────────────────┤
//! │   Randomizer    │    MazeBuilder    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use tankwars::{Command, MatchConfig, TankWars};
//!
//! let mut engine = TankWars::seeded(42);
//! engine.new_match(&MatchConfig::new(5, 50, 20)).unwrap();
//! engine.execute_command(0, Command::Forward).unwrap();
//!
//! let map = engine.map().unwrap();
//! assert_eq!(map.tanks().len(), 5);
//! ```

pub mod engine;
pub mod error;
pub mod game;
pub mod maze;
pub mod random;
pub mod replay;
pub mod simulate;

pub use engine::{MatchConfig, TankWars};
pub use error::{EngineError, EngineResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Command, Coord, DamageRules, Direction, EventKind, MatchEvent, MatchState, Outcome, Tank,
    TankIndex, TankStatus, Wall,
};
pub use maze::{MazeBuilder, OpenField, ScatterMaze};
pub use random::{Randomizer, SeededRandomizer};
