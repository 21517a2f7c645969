//! Grid coordinates and compass directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row, growing downwards).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Check if this coordinate lies on a `width` x `height` grid.
    #[must_use]
    pub const fn in_bounds(self, width: u16, height: u16) -> bool {
        self.x < width && self.y < height
    }

    /// The neighbouring cell one step towards `direction`.
    ///
    /// Returns `None` when the step leaves the grid.
    #[must_use]
    #[inline]
    pub fn step(self, direction: Direction, width: u16, height: u16) -> Option<Coord> {
        let (dx, dy) = direction.delta();
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        let next = Coord::new(x, y);
        next.in_bounds(width, height).then_some(next)
    }

    /// Every cell of a `width` x `height` grid in column-major order.
    pub fn column_major(width: u16, height: u16) -> impl Iterator<Item = Coord> {
        (0..width).flat_map(move |x| (0..height).map(move |y| Coord::new(x, y)))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass direction a tank faces or moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards decreasing `y`.
    Top,
    /// Towards increasing `y`.
    Bottom,
    /// Towards decreasing `x`.
    Left,
    /// Towards increasing `x`.
    Right,
}

impl Direction {
    /// Orientation deck order used when a match is set up,
    /// counter-clockwise starting from `Top`.
    pub const DECK: [Direction; 4] = [
        Direction::Top,
        Direction::Left,
        Direction::Bottom,
        Direction::Right,
    ];

    /// Unit displacement `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::Bottom => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The direction whose displacement is the negation of this one.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Lowercase name as exposed to collaborators.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
