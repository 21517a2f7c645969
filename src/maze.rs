//! Wall layout generation.

use crate::game::Coord;
use crate::random::{Randomizer, SeededRandomizer};

/// Fraction of cells [`ScatterMaze`] turns into walls by default.
pub const DEFAULT_WALL_DENSITY: f64 = 0.10;

/// Produces the wall cells for a new match.
///
/// Any `FnMut(u16, u16) -> Vec<Coord>` closure is a builder.
pub trait MazeBuilder {
    /// Wall coordinates for a `width` x `height` grid.
    fn build(&mut self, width: u16, height: u16) -> Vec<Coord>;
}

impl<F> MazeBuilder for F
where
    F: FnMut(u16, u16) -> Vec<Coord>,
{
    fn build(&mut self, width: u16, height: u16) -> Vec<Coord> {
        self(width, height)
    }
}

/// Scatters walls over roughly `density` of the cells.
#[derive(Debug, Clone, Copy)]
pub struct ScatterMaze {
    rng: SeededRandomizer,
    density: f64,
}

impl ScatterMaze {
    /// Create a builder with the default density.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: SeededRandomizer::new(seed),
            density: DEFAULT_WALL_DENSITY,
        }
    }

    /// Override the wall density, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density.clamp(0.0, 1.0);
        self
    }
}

impl MazeBuilder for ScatterMaze {
    fn build(&mut self, width: u16, height: u16) -> Vec<Coord> {
        let mut walls = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let noise = self.rng.random();
                if noise < self.density {
                    walls.push(Coord::new(x, y));
                }
            }
        }
        walls
    }
}

/// A map without walls.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl MazeBuilder for OpenField {
    fn build(&mut self, _width: u16, _height: u16) -> Vec<Coord> {
        Vec::new()
    }
}
