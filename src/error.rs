//! Error types for the match engine.

use std::fmt;

use crate::game::Coord;

/// Errors raised by match setup and command execution.
///
/// Every variant is a caller contract violation; the engine never retries
/// and never leaves state half-mutated when it returns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A command was issued before any match was created.
    NoMatch,
    /// Tank index outside the tank list.
    InvalidTankIndex {
        /// The index that was requested.
        index: usize,
        /// Number of tanks in the match.
        count: usize,
    },
    /// Command name that is neither `forward` nor `reverse`.
    UnknownCommand(String),
    /// Match configuration with a zero tank count, dimension or wall strength.
    InvalidConfig(String),
    /// More tanks requested than empty cells on the map.
    NotEnoughSpace {
        /// Tanks requested.
        requested: usize,
        /// Empty cells available.
        available: usize,
    },
    /// A layout that breaks a state invariant.
    InvalidLayout(String),
}

impl EngineError {
    /// Layout error for a coordinate outside the grid.
    pub(crate) fn out_of_bounds(what: &str, coord: Coord, width: u16, height: u16) -> Self {
        Self::InvalidLayout(format!(
            "{what} at ({}, {}) is outside the {width}x{height} map",
            coord.x, coord.y
        ))
    }

    /// Layout error for two objects sharing a cell.
    pub(crate) fn overlap(what: &str, coord: Coord) -> Self {
        Self::InvalidLayout(format!("{what} overlap at ({}, {})", coord.x, coord.y))
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "no match in progress"),
            Self::InvalidTankIndex { index, count } => {
                write!(f, "tank index {index} out of range ({count} tanks)")
            }
            Self::UnknownCommand(name) => write!(f, "unknown command: {name:?}"),
            Self::InvalidConfig(reason) => write!(f, "invalid match config: {reason}"),
            Self::NotEnoughSpace {
                requested,
                available,
            } => write!(
                f,
                "cannot place {requested} tanks: only {available} empty cells"
            ),
            Self::InvalidLayout(reason) => write!(f, "invalid layout: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::InvalidTankIndex { index: 3, count: 2 };
        assert_eq!(err.to_string(), "tank index 3 out of range (2 tanks)");

        let err = EngineError::NotEnoughSpace {
            requested: 10,
            available: 4,
        };
        assert!(err.to_string().contains("only 4 empty cells"));

        let err = EngineError::out_of_bounds("wall", Coord::new(7, 1), 5, 5);
        assert_eq!(
            err.to_string(),
            "invalid layout: wall at (7, 1) is outside the 5x5 map"
        );
    }
}
