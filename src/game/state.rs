//! Match state management.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::game::{Coord, Tank, TankIndex, Wall};

/// Damage a wall inflicts on a tank that runs into it, unless configured.
pub const DEFAULT_WALL_DAMAGE: u32 = 10;
/// Damage a tank inflicts in any collision, unless configured.
pub const DEFAULT_TANK_DAMAGE: u32 = 20;

/// Damage constants, fixed for the lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRules {
    /// Damage taken by a tank bumping a wall or the map edge.
    pub wall_damage: u32,
    /// Damage dealt by a tank: to a wall it rams, or to both tanks in a ram.
    pub tank_damage: u32,
}

impl Default for DamageRules {
    fn default() -> Self {
        Self {
            wall_damage: DEFAULT_WALL_DAMAGE,
            tank_damage: DEFAULT_TANK_DAMAGE,
        }
    }
}

/// Fully specified match layout, as accepted from tests and save files.
///
/// Missing damage values fall back to [`DamageRules::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLayout {
    /// Grid width.
    #[serde(alias = "mapWidth")]
    pub width: u16,
    /// Grid height.
    #[serde(alias = "mapHeight")]
    pub height: u16,
    /// Tanks in index order.
    #[serde(default)]
    pub tanks: Vec<Tank>,
    /// Walls.
    #[serde(default)]
    pub walls: Vec<Wall>,
    /// Wall damage override.
    #[serde(default)]
    pub wall_damage: Option<u32>,
    /// Tank damage override.
    #[serde(default)]
    pub tank_damage: Option<u32>,
}

impl TryFrom<MatchLayout> for MatchState {
    type Error = EngineError;

    fn try_from(layout: MatchLayout) -> Result<Self, Self::Error> {
        let defaults = DamageRules::default();
        let rules = DamageRules {
            wall_damage: layout.wall_damage.unwrap_or(defaults.wall_damage),
            tank_damage: layout.tank_damage.unwrap_or(defaults.tank_damage),
        };
        MatchState::new(layout.width, layout.height, layout.tanks, layout.walls, rules)
    }
}

/// Complete state of one match.
///
/// Only the command resolver mutates a state once it is built, so every
/// state observed through this type satisfies the layout invariants checked
/// by [`MatchState::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatchLayout", rename_all = "camelCase")]
pub struct MatchState {
    width: u16,
    height: u16,
    tanks: Vec<Tank>,
    walls: Vec<Wall>,
    wall_damage: u32,
    tank_damage: u32,
}

impl MatchState {
    /// Build a state from a fully specified layout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for a zero dimension and
    /// [`EngineError::InvalidLayout`] if any object is out of bounds, two
    /// objects share a cell, or a wall has no strength left.
    pub fn new(
        width: u16,
        height: u16,
        tanks: Vec<Tank>,
        walls: Vec<Wall>,
        rules: DamageRules,
    ) -> EngineResult<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "map must be at least 1x1, got {width}x{height}"
            )));
        }

        let mut wall_cells = HashSet::with_capacity(walls.len());
        for wall in &walls {
            let pos = wall.position();
            if !pos.in_bounds(width, height) {
                return Err(EngineError::out_of_bounds("wall", pos, width, height));
            }
            if !wall_cells.insert(pos) {
                return Err(EngineError::overlap("wall", pos));
            }
            if wall.strength == 0 {
                return Err(EngineError::InvalidLayout(format!(
                    "wall at {pos} has zero strength"
                )));
            }
        }

        let mut tank_cells = HashSet::with_capacity(tanks.len());
        for tank in &tanks {
            let pos = tank.position();
            if !pos.in_bounds(width, height) {
                return Err(EngineError::out_of_bounds("tank", pos, width, height));
            }
            if wall_cells.contains(&pos) {
                return Err(EngineError::overlap("tank/wall", pos));
            }
            if !tank_cells.insert(pos) {
                return Err(EngineError::overlap("tank", pos));
            }
        }

        Ok(Self {
            width,
            height,
            tanks,
            walls,
            wall_damage: rules.wall_damage,
            tank_damage: rules.tank_damage,
        })
    }

    /// Width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// All tanks in index order, destroyed ones included.
    #[must_use]
    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// Remaining walls.
    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Damage a wall or the map edge deals to a tank.
    #[must_use]
    pub const fn wall_damage(&self) -> u32 {
        self.wall_damage
    }

    /// Damage a tank deals in a collision.
    #[must_use]
    pub const fn tank_damage(&self) -> u32 {
        self.tank_damage
    }

    /// Damage constants of this match.
    #[must_use]
    pub const fn rules(&self) -> DamageRules {
        DamageRules {
            wall_damage: self.wall_damage,
            tank_damage: self.tank_damage,
        }
    }

    /// Get a tank by index.
    #[must_use]
    pub fn tank(&self, index: TankIndex) -> Option<&Tank> {
        self.tanks.get(index)
    }

    /// Index of the tank on `coord`, if any.
    #[must_use]
    pub fn tank_at(&self, coord: Coord) -> Option<TankIndex> {
        self.tanks.iter().position(|t| t.position() == coord)
    }

    /// Index of the wall on `coord`, if any.
    #[must_use]
    pub fn wall_at(&self, coord: Coord) -> Option<usize> {
        self.walls.iter().position(|w| w.position() == coord)
    }

    /// Indices of tanks with strength left.
    pub fn surviving_tanks(&self) -> impl Iterator<Item = TankIndex> + '_ {
        self.tanks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_destroyed())
            .map(|(i, _)| i)
    }

    /// Count of tanks with strength left.
    #[must_use]
    pub fn surviving_count(&self) -> usize {
        self.surviving_tanks().count()
    }

    pub(crate) fn tanks_mut(&mut self) -> &mut [Tank] {
        &mut self.tanks
    }

    pub(crate) fn walls_mut(&mut self) -> &mut Vec<Wall> {
        &mut self.walls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    fn tank(x: u16, y: u16) -> Tank {
        Tank::new(Coord::new(x, y), Direction::Top, 100)
    }

    fn wall(x: u16, y: u16) -> Wall {
        Wall::new(Coord::new(x, y), 100)
    }

    #[test]
    fn test_valid_layout() {
        let state = MatchState::new(
            5,
            5,
            vec![tank(1, 2), tank(4, 4)],
            vec![wall(3, 3)],
            DamageRules::default(),
        )
        .unwrap();

        assert_eq!(state.width(), 5);
        assert_eq!(state.height(), 5);
        assert_eq!(state.tank_at(Coord::new(4, 4)), Some(1));
        assert_eq!(state.wall_at(Coord::new(3, 3)), Some(0));
        assert_eq!(state.tank_at(Coord::new(0, 0)), None);
        assert_eq!(state.wall_damage(), DEFAULT_WALL_DAMAGE);
        assert_eq!(state.tank_damage(), DEFAULT_TANK_DAMAGE);
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = MatchState::new(0, 5, vec![], vec![], DamageRules::default());
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let result = MatchState::new(5, 5, vec![tank(5, 0)], vec![], DamageRules::default());
        assert!(matches!(result, Err(EngineError::InvalidLayout(_))));

        let result = MatchState::new(5, 5, vec![], vec![wall(0, 9)], DamageRules::default());
        assert!(matches!(result, Err(EngineError::InvalidLayout(_))));
    }

    #[test]
    fn test_overlaps_rejected() {
        let stacked_tanks =
            MatchState::new(5, 5, vec![tank(1, 1), tank(1, 1)], vec![], DamageRules::default());
        assert!(stacked_tanks.is_err());

        let stacked_walls =
            MatchState::new(5, 5, vec![], vec![wall(2, 2), wall(2, 2)], DamageRules::default());
        assert!(stacked_walls.is_err());

        let tank_in_wall =
            MatchState::new(5, 5, vec![tank(2, 2)], vec![wall(2, 2)], DamageRules::default());
        assert!(tank_in_wall.is_err());
    }

    #[test]
    fn test_zero_strength_wall_rejected() {
        let result = MatchState::new(
            5,
            5,
            vec![tank(1, 1)],
            vec![Wall::new(Coord::new(3, 3), 0)],
            DamageRules::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidLayout(_))));

        let json = r#"{
            "mapWidth": 5,
            "mapHeight": 5,
            "tanks": [{"x": 0, "y": 0}],
            "walls": [{"x": 3, "y": 3, "strength": 0}]
        }"#;
        assert!(serde_json::from_str::<MatchState>(json).is_err());
    }

    #[test]
    fn test_layout_from_json() {
        let state: MatchState = serde_json::from_str(
            r#"{
                "mapWidth": 5,
                "mapHeight": 5,
                "tanks": [{"x": 1, "y": 2, "strength": 200, "direction": "right"}],
                "walls": [{"x": 3, "y": 3, "strength": 100}],
                "wallDamage": 30
            }"#,
        )
        .unwrap();

        assert_eq!(state.tanks()[0].strength, 200);
        assert_eq!(state.tanks()[0].direction, Direction::Right);
        assert_eq!(state.wall_damage(), 30);
        assert_eq!(state.tank_damage(), DEFAULT_TANK_DAMAGE);
    }

    #[test]
    fn test_invalid_json_layout_rejected() {
        let result: Result<MatchState, _> = serde_json::from_str(
            r#"{"width": 2, "height": 2, "tanks": [{"x": 1, "y": 1}], "walls": [{"x": 1, "y": 1}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_serialization_shape() {
        let state = MatchState::new(5, 5, vec![tank(1, 2)], vec![wall(3, 3)], DamageRules::default())
            .unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["width"], 5);
        assert_eq!(json["height"], 5);
        assert_eq!(json["tanks"][0]["status"], "static");
        assert_eq!(json["walls"][0]["strength"], 100);
        assert_eq!(json["wallDamage"], DEFAULT_WALL_DAMAGE);

        let back: MatchState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_surviving_tanks() {
        let mut dead = tank(0, 0);
        dead.strength = 0;
        let state =
            MatchState::new(5, 5, vec![dead, tank(1, 1), tank(2, 2)], vec![], DamageRules::default())
                .unwrap();
        let alive: Vec<_> = state.surviving_tanks().collect();
        assert_eq!(alive, vec![1, 2]);
        assert_eq!(state.surviving_count(), 2);
    }
}
