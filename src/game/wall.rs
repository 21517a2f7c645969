//! Destructible walls.

use serde::{Deserialize, Serialize};

use crate::game::Coord;

/// Strength a wall is built with unless configured otherwise.
pub const DEFAULT_WALL_STRENGTH: u32 = 100;

/// A wall occupying one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Remaining strength. A wall at zero is removed from the match.
    #[serde(default = "default_strength")]
    pub strength: u32,
}

fn default_strength() -> u32 {
    DEFAULT_WALL_STRENGTH
}

impl Wall {
    /// Create a wall at `position`.
    #[must_use]
    pub const fn new(position: Coord, strength: u32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            strength,
        }
    }

    /// Occupied cell.
    #[must_use]
    pub const fn position(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Apply damage, flooring strength at zero.
    ///
    /// Returns `true` if the wall is now destroyed.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.strength = self.strength.saturating_sub(damage);
        self.strength == 0
    }
}
