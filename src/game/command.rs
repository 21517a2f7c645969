//! Command resolution.
//!
//! A command moves one tank a single cell along its facing axis. Blocked
//! moves turn into bumps: a wall inflicts `wall_damage` on the tank and takes
//! `tank_damage` back, while two tanks both take `tank_damage`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::game::{Coord, Direction, MatchState, TankIndex, TankStatus};

/// A command issued to one tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Move one cell towards the facing direction.
    Forward,
    /// Move one cell away from the facing direction.
    Reverse,
}

impl Command {
    /// Both commands, in a fixed order.
    pub const ALL: [Command; 2] = [Command::Forward, Command::Reverse];

    /// Direction of travel for a tank facing `facing`.
    #[must_use]
    pub const fn heading(self, facing: Direction) -> Direction {
        match self {
            Command::Forward => facing,
            Command::Reverse => facing.opposite(),
        }
    }

    /// Lowercase command name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Command::Forward => "forward",
            Command::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Command::Forward),
            "reverse" => Ok(Command::Reverse),
            other => Err(EngineError::UnknownCommand(other.to_string())),
        }
    }
}

/// What happened when a command was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    /// The tank moved into an empty cell.
    Moved {
        /// Cell the tank left.
        from: Coord,
        /// Cell the tank entered.
        to: Coord,
    },
    /// The tank drove into the map border.
    HitEdge,
    /// The tank rammed a wall.
    HitWall {
        /// Cell of the wall.
        wall: Coord,
        /// Whether the wall was destroyed and removed.
        destroyed: bool,
    },
    /// The tank rammed another tank.
    HitTank {
        /// Index of the rammed tank.
        target: TankIndex,
    },
}

impl Outcome {
    /// Check if the command ended in a collision.
    #[must_use]
    pub const fn is_bump(self) -> bool {
        !matches!(self, Outcome::Moved { .. })
    }
}

/// Apply `command` to tank `index`, mutating `state` in place.
///
/// Every other tank is reset to [`TankStatus::Static`] first. Destroyed
/// tanks can still be commanded; zero strength only means elimination to
/// callers.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTankIndex`] if `index` is out of range.
/// The state is untouched in that case.
pub fn resolve_command(
    state: &mut MatchState,
    index: TankIndex,
    command: Command,
) -> EngineResult<Outcome> {
    let count = state.tanks().len();
    let Some(actor) = state.tank(index) else {
        return Err(EngineError::InvalidTankIndex { index, count });
    };

    let from = actor.position();
    let heading = command.heading(actor.direction);
    let target = from.step(heading, state.width(), state.height());
    let rules = state.rules();

    for (i, tank) in state.tanks_mut().iter_mut().enumerate() {
        if i != index {
            tank.status = TankStatus::Static;
        }
    }

    let outcome = match target {
        None => {
            let actor = &mut state.tanks_mut()[index];
            actor.status = TankStatus::Bump(heading);
            actor.take_damage(rules.wall_damage);
            Outcome::HitEdge
        }
        Some(to) => {
            if let Some(wall_idx) = state.wall_at(to) {
                let destroyed = state.walls_mut()[wall_idx].take_damage(rules.tank_damage);
                if destroyed {
                    state.walls_mut().remove(wall_idx);
                }
                let actor = &mut state.tanks_mut()[index];
                actor.status = TankStatus::Bump(heading);
                actor.take_damage(rules.wall_damage);
                Outcome::HitWall {
                    wall: to,
                    destroyed,
                }
            } else if let Some(target_idx) = state.tank_at(to) {
                let tanks = state.tanks_mut();
                let rammed = &mut tanks[target_idx];
                rammed.status = TankStatus::Bumped;
                rammed.take_damage(rules.tank_damage);
                let actor = &mut tanks[index];
                actor.status = TankStatus::Bump(heading);
                actor.take_damage(rules.tank_damage);
                Outcome::HitTank { target: target_idx }
            } else {
                let actor = &mut state.tanks_mut()[index];
                actor.relocate(to);
                actor.status = TankStatus::Moving;
                Outcome::Moved { from, to }
            }
        }
    };

    debug!(
        tank = index,
        %command,
        %heading,
        ?outcome,
        strength = state.tanks()[index].strength,
        "resolved command"
    );

    Ok(outcome)
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    /// Prove that clamped damage never exceeds the starting strength.
    #[kani::proof]
    fn prove_damage_never_increases_strength() {
        let strength: u32 = kani::any();
        let damage: u32 = kani::any();

        let remaining = strength.saturating_sub(damage);

        assert!(remaining <= strength);
        if damage >= strength {
            assert!(remaining == 0);
        } else {
            assert!(remaining == strength - damage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DamageRules, Tank, Wall};

    fn rules() -> DamageRules {
        DamageRules {
            wall_damage: 30,
            tank_damage: 50,
        }
    }

    fn state(tanks: Vec<Tank>, walls: Vec<Wall>) -> MatchState {
        MatchState::new(5, 5, tanks, walls, rules()).unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!("forward".parse::<Command>().unwrap(), Command::Forward);
        assert_eq!("reverse".parse::<Command>().unwrap(), Command::Reverse);
        assert_eq!(
            "fire".parse::<Command>(),
            Err(EngineError::UnknownCommand("fire".to_string()))
        );
    }

    #[test]
    fn test_heading() {
        assert_eq!(Command::Forward.heading(Direction::Top), Direction::Top);
        assert_eq!(Command::Reverse.heading(Direction::Top), Direction::Bottom);
        assert_eq!(Command::Reverse.heading(Direction::Left), Direction::Right);
    }

    #[test]
    fn test_move_into_empty_cell() {
        let mut s = state(
            vec![Tank::new(Coord::new(1, 2), Direction::Right, 100)],
            vec![Wall::new(Coord::new(3, 3), 100)],
        );
        let outcome = resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert_eq!(
            outcome,
            Outcome::Moved {
                from: Coord::new(1, 2),
                to: Coord::new(2, 2)
            }
        );
        let tank = &s.tanks()[0];
        assert_eq!(tank.position(), Coord::new(2, 2));
        assert_eq!(tank.status, TankStatus::Moving);
        assert_eq!(tank.strength, 100);
        assert_eq!(tank.direction, Direction::Right);
    }

    #[test]
    fn test_wall_bump_damages_both() {
        let mut s = state(
            vec![Tank::new(Coord::new(1, 2), Direction::Top, 200)],
            vec![
                Wall::new(Coord::new(3, 3), 100),
                Wall::new(Coord::new(1, 1), 100),
            ],
        );
        let outcome = resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert_eq!(
            outcome,
            Outcome::HitWall {
                wall: Coord::new(1, 1),
                destroyed: false
            }
        );
        assert_eq!(s.tanks()[0].position(), Coord::new(1, 2));
        assert_eq!(s.tanks()[0].status, TankStatus::Bump(Direction::Top));
        assert_eq!(s.tanks()[0].strength, 170);
        assert_eq!(s.walls()[0].strength, 100);
        assert_eq!(s.walls()[1].strength, 50);
    }

    #[test]
    fn test_weak_wall_removed() {
        let mut s = state(
            vec![Tank::new(Coord::new(1, 2), Direction::Top, 200)],
            vec![
                Wall::new(Coord::new(3, 3), 100),
                Wall::new(Coord::new(1, 1), 20),
            ],
        );
        let outcome = resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert!(matches!(outcome, Outcome::HitWall { destroyed: true, .. }));
        assert_eq!(s.walls().len(), 1);
        assert_eq!(s.walls()[0].position(), Coord::new(3, 3));
        assert_eq!(s.tanks()[0].strength, 170);
    }

    #[test]
    fn test_tank_ram_is_symmetric() {
        let mut s = state(
            vec![
                Tank::new(Coord::new(1, 2), Direction::Right, 200),
                Tank::new(Coord::new(2, 2), Direction::Top, 100),
            ],
            vec![],
        );
        let outcome = resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert_eq!(outcome, Outcome::HitTank { target: 1 });
        assert_eq!(s.tanks()[0].position(), Coord::new(1, 2));
        assert_eq!(s.tanks()[0].status, TankStatus::Bump(Direction::Right));
        assert_eq!(s.tanks()[0].strength, 150);
        assert_eq!(s.tanks()[1].status, TankStatus::Bumped);
        assert_eq!(s.tanks()[1].strength, 50);
    }

    #[test]
    fn test_reverse_uses_opposite_heading() {
        let mut s = state(
            vec![Tank::new(Coord::new(1, 2), Direction::Top, 200)],
            vec![Wall::new(Coord::new(1, 3), 100)],
        );
        resolve_command(&mut s, 0, Command::Reverse).unwrap();

        assert_eq!(s.tanks()[0].status, TankStatus::Bump(Direction::Bottom));
        assert_eq!(s.tanks()[0].strength, 170);
        assert_eq!(s.tanks()[0].direction, Direction::Top);
    }

    #[test]
    fn test_map_edge_blocks_like_wall() {
        let mut s = state(vec![Tank::new(Coord::new(0, 2), Direction::Left, 100)], vec![]);
        let outcome = resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert_eq!(outcome, Outcome::HitEdge);
        assert!(outcome.is_bump());
        assert_eq!(s.tanks()[0].position(), Coord::new(0, 2));
        assert_eq!(s.tanks()[0].status, TankStatus::Bump(Direction::Left));
        assert_eq!(s.tanks()[0].strength, 70);
    }

    #[test]
    fn test_other_tanks_reset_to_static() {
        let mut idle = Tank::new(Coord::new(4, 4), Direction::Top, 100);
        idle.status = TankStatus::Moving;
        let mut s = state(vec![Tank::new(Coord::new(1, 2), Direction::Top, 100), idle], vec![]);
        resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert_eq!(s.tanks()[1].status, TankStatus::Static);
    }

    #[test]
    fn test_invalid_index_leaves_state_untouched() {
        let mut moving = Tank::new(Coord::new(1, 2), Direction::Top, 100);
        moving.status = TankStatus::Moving;
        let mut s = state(vec![moving], vec![]);
        let before = s.clone();

        let result = resolve_command(&mut s, 1, Command::Forward);
        assert_eq!(result, Err(EngineError::InvalidTankIndex { index: 1, count: 1 }));
        assert_eq!(s, before);
    }

    #[test]
    fn test_destroyed_tank_still_blocks() {
        let wreck = Tank::new(Coord::new(2, 2), Direction::Top, 0);
        let mut s = state(vec![Tank::new(Coord::new(1, 2), Direction::Right, 100), wreck], vec![]);
        let outcome = resolve_command(&mut s, 0, Command::Forward).unwrap();

        assert_eq!(outcome, Outcome::HitTank { target: 1 });
        assert_eq!(s.tanks()[1].strength, 0);
        assert_eq!(s.tanks()[1].status, TankStatus::Bumped);
    }
}
