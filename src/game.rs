//! Game layer for Tank Wars.
//!
//! Implements the match rules:
//! - Grid coordinates and compass directions
//! - Tanks and destructible walls
//! - Command resolution (movement, bumps, damage)
//! - Per-engine event notification
//! - Invariant checks

mod command;
mod events;
pub mod invariants;
mod map;
mod state;
mod tank;
mod wall;

pub use command::{Command, Outcome, resolve_command};
pub use events::{EventKind, MatchEvent, Notifier};
pub use map::{Coord, Direction};
pub use state::{DEFAULT_TANK_DAMAGE, DEFAULT_WALL_DAMAGE, DamageRules, MatchLayout, MatchState};
pub use tank::{DEFAULT_TANK_STRENGTH, Tank, TankIndex, TankStatus};
pub use wall::{DEFAULT_WALL_STRENGTH, Wall};
