//! Match invariants - sanity checks that detect resolver bugs.
//!
//! A state built through [`MatchState::new`] and mutated only by the command
//! resolver should never trip these.

use std::collections::HashSet;

use crate::game::{MatchState, TankIndex, TankStatus};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check the invariants of a single state.
///
/// Returns every violation found, or an empty list if all hold.
#[must_use]
pub fn check_invariants(state: &MatchState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let (width, height) = (state.width(), state.height());

    let mut wall_cells = HashSet::new();
    for wall in state.walls() {
        let pos = wall.position();
        if !pos.in_bounds(width, height) {
            violations.push(violation(format!("Wall at {pos} is out of bounds")));
        }
        if !wall_cells.insert(pos) {
            violations.push(violation(format!("Two walls share {pos}")));
        }
        if wall.strength == 0 {
            violations.push(violation(format!("Destroyed wall at {pos} was not removed")));
        }
    }

    let mut tank_cells = HashSet::new();
    for (i, tank) in state.tanks().iter().enumerate() {
        let pos = tank.position();
        if !pos.in_bounds(width, height) {
            violations.push(violation(format!("Tank {i} at {pos} is out of bounds")));
        }
        if wall_cells.contains(&pos) {
            violations.push(violation(format!("Tank {i} sits inside the wall at {pos}")));
        }
        if !tank_cells.insert(pos) {
            violations.push(violation(format!("Tank {i} shares {pos} with another tank")));
        }
    }

    violations
}

/// Check the properties that must hold between two consecutive states,
/// where `after` is `before` with a command applied to tank `actor`.
#[must_use]
pub fn check_transition(
    before: &MatchState,
    after: &MatchState,
    actor: TankIndex,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if after.walls().len() > before.walls().len() {
        violations.push(violation(format!(
            "Wall count grew from {} to {}",
            before.walls().len(),
            after.walls().len()
        )));
    }

    if after.tanks().len() != before.tanks().len() {
        violations.push(violation(format!(
            "Tank count changed from {} to {}",
            before.tanks().len(),
            after.tanks().len()
        )));
    }

    for (i, (old, new)) in before.tanks().iter().zip(after.tanks()).enumerate() {
        if new.strength > old.strength {
            violations.push(violation(format!(
                "Tank {i} strength rose from {} to {}",
                old.strength, new.strength
            )));
        }
        if new.direction != old.direction {
            violations.push(violation(format!("Tank {i} changed facing")));
        }
        if i != actor && new.position() != old.position() {
            violations.push(violation(format!("Tank {i} moved without a command")));
        }
        if i != actor && !matches!(new.status, TankStatus::Static | TankStatus::Bumped) {
            violations.push(violation(format!(
                "Bystander tank {i} has status {}",
                new.status
            )));
        }
    }

    if let (Some(old), Some(new)) = (before.tank(actor), after.tank(actor))
        && new.status != TankStatus::Moving
        && new.position() != old.position()
    {
        violations.push(violation(format!(
            "Tank {actor} changed cell despite status {}",
            new.status
        )));
    }

    violations
}

/// Assert all match invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &MatchState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Match invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &MatchState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Command, Coord, DamageRules, Direction, Tank, Wall, resolve_command};

    fn create_valid_match() -> MatchState {
        MatchState::new(
            5,
            5,
            vec![
                Tank::new(Coord::new(1, 2), Direction::Right, 200),
                Tank::new(Coord::new(2, 2), Direction::Top, 100),
            ],
            vec![Wall::new(Coord::new(3, 3), 100)],
            DamageRules::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_match_passes() {
        let state = create_valid_match();
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_overlapping_tanks_detected() {
        let mut state = create_valid_match();
        state.tanks_mut()[1].relocate(Coord::new(1, 2));

        let violations = check_invariants(&state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("shares"));
    }

    #[test]
    fn test_tank_in_wall_detected() {
        let mut state = create_valid_match();
        state.tanks_mut()[0].relocate(Coord::new(3, 3));

        let violations = check_invariants(&state);
        assert!(violations.iter().any(|v| v.message.contains("inside the wall")));
    }

    #[test]
    fn test_zero_strength_wall_detected() {
        let mut state = create_valid_match();
        state.walls_mut()[0].strength = 0;

        let violations = check_invariants(&state);
        assert!(violations[0].message.contains("not removed"));
    }

    #[test]
    fn test_out_of_bounds_detected() {
        let mut state = create_valid_match();
        state.tanks_mut()[0].relocate(Coord::new(9, 9));

        let violations = check_invariants(&state);
        assert!(violations[0].message.contains("out of bounds"));
    }

    #[test]
    fn test_resolved_transition_passes() {
        let before = create_valid_match();
        let mut after = before.clone();
        resolve_command(&mut after, 0, Command::Forward).unwrap();

        assert!(check_invariants(&after).is_empty());
        assert!(check_transition(&before, &after, 0).is_empty());
    }

    #[test]
    fn test_bystander_movement_detected() {
        let before = create_valid_match();
        let mut after = before.clone();
        after.tanks_mut()[1].relocate(Coord::new(2, 3));

        let violations = check_transition(&before, &after, 0);
        assert!(violations.iter().any(|v| v.message.contains("without a command")));
    }

    #[test]
    fn test_wall_growth_detected() {
        let before = create_valid_match();
        let mut after = before.clone();
        after.walls_mut().push(Wall::new(Coord::new(0, 0), 100));

        let violations = check_transition(&before, &after, 0);
        assert!(violations[0].message.contains("Wall count grew"));
    }

    #[test]
    fn test_strength_gain_detected() {
        let before = create_valid_match();
        let mut after = before.clone();
        after.tanks_mut()[0].strength += 1;

        let violations = check_transition(&before, &after, 0);
        assert!(violations.iter().any(|v| v.message.contains("strength rose")));
    }

    #[test]
    #[should_panic(expected = "Match invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let mut state = create_valid_match();
        state.tanks_mut()[1].relocate(Coord::new(1, 2));
        assert_invariants(&state);
    }
}
