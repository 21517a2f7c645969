//! Tank state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::game::{Coord, Direction};

/// Strength a tank spawns with unless configured otherwise.
pub const DEFAULT_TANK_STRENGTH: u32 = 100;

/// Index of a tank in the match's tank list.
///
/// Indices are assigned at setup and never reused within a match.
pub type TankIndex = usize;

/// Outcome tag of the last command applied to a tank.
///
/// Serialized as `static`, `moving`, `bumped` or `bump-<direction>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TankStatus {
    /// Not involved in the last command.
    #[default]
    Static,
    /// Moved one cell.
    Moving,
    /// Rammed by another tank.
    Bumped,
    /// Blocked while moving towards the given direction.
    Bump(Direction),
}

impl fmt::Display for TankStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TankStatus::Static => f.write_str("static"),
            TankStatus::Moving => f.write_str("moving"),
            TankStatus::Bumped => f.write_str("bumped"),
            TankStatus::Bump(direction) => write!(f, "bump-{direction}"),
        }
    }
}

impl FromStr for TankStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(TankStatus::Static),
            "moving" => Ok(TankStatus::Moving),
            "bumped" => Ok(TankStatus::Bumped),
            "bump-top" => Ok(TankStatus::Bump(Direction::Top)),
            "bump-bottom" => Ok(TankStatus::Bump(Direction::Bottom)),
            "bump-left" => Ok(TankStatus::Bump(Direction::Left)),
            "bump-right" => Ok(TankStatus::Bump(Direction::Right)),
            other => Err(format!("unknown tank status: {other:?}")),
        }
    }
}

impl Serialize for TankStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TankStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A tank on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tank {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Remaining strength. Zero means destroyed.
    #[serde(default = "default_strength")]
    pub strength: u32,
    /// Facing direction. Never changed by commands.
    #[serde(default = "default_direction")]
    pub direction: Direction,
    /// Result of the last command.
    #[serde(default)]
    pub status: TankStatus,
}

fn default_strength() -> u32 {
    DEFAULT_TANK_STRENGTH
}

fn default_direction() -> Direction {
    Direction::Top
}

impl Tank {
    /// Create a static tank at `position`.
    #[must_use]
    pub const fn new(position: Coord, direction: Direction, strength: u32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            strength,
            direction,
            status: TankStatus::Static,
        }
    }

    /// Current cell.
    #[must_use]
    pub const fn position(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Move to a new cell.
    pub fn relocate(&mut self, to: Coord) {
        self.x = to.x;
        self.y = to.y;
    }

    /// Apply damage, flooring strength at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.strength = self.strength.saturating_sub(damage);
    }

    /// Check if the tank has no strength left.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.strength == 0
    }
}
