//! ASCII renderer for terminal viewing.

use std::fmt::Write as _;

use crate::game::{Coord, Direction, MatchState, Tank};

/// Render a match state to ASCII.
///
/// Output format:
/// ```text
/// Step 12                      Tanks alive: 2/3
/// ┌─────────────┐
/// │ . # . . . . │
/// │ . > . x . . │
/// │ . . . . ^ . │
/// └─────────────┘
///
/// Legend: #=Wall  ^v<>=Tank facing  x=Destroyed tank  .=Empty
///
/// Tank 0  (1, 1)  facing right   strength 100  moving
/// ```
#[must_use]
pub fn render_ascii(state: &MatchState, step: Option<usize>) -> String {
    let mut output = String::new();

    render_header(&mut output, state, step);
    render_map(&mut output, state);
    output.push_str("\nLegend: #=Wall  ^v<>=Tank facing  x=Destroyed tank  .=Empty\n\n");
    render_tank_stats(&mut output, state);

    output
}

fn render_header(output: &mut String, state: &MatchState, step: Option<usize>) {
    let label = match step {
        Some(step) => format!("Step {step}"),
        None => String::from("Match"),
    };
    let _ = writeln!(
        output,
        "{label:<28} Tanks alive: {}/{}",
        state.surviving_count(),
        state.tanks().len()
    );
}

fn render_map(output: &mut String, state: &MatchState) {
    let border = "─".repeat(usize::from(state.width()) * 2 + 1);

    let _ = writeln!(output, "┌{border}┐");
    for y in 0..state.height() {
        output.push_str("│ ");
        for x in 0..state.width() {
            output.push(cell_glyph(state, Coord::new(x, y)));
            output.push(' ');
        }
        output.push_str("│\n");
    }
    let _ = writeln!(output, "└{border}┘");
}

fn cell_glyph(state: &MatchState, coord: Coord) -> char {
    if state.wall_at(coord).is_some() {
        return '#';
    }
    match state.tank_at(coord).and_then(|index| state.tank(index)) {
        Some(tank) => tank_glyph(tank),
        None => '.',
    }
}

fn tank_glyph(tank: &Tank) -> char {
    if tank.is_destroyed() {
        return 'x';
    }
    match tank.direction {
        Direction::Top => '^',
        Direction::Bottom => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

fn render_tank_stats(output: &mut String, state: &MatchState) {
    for (index, tank) in state.tanks().iter().enumerate() {
        let position = tank.position().to_string();
        if tank.is_destroyed() {
            let _ = writeln!(output, "Tank {index:<2} {position:<10} DESTROYED");
            continue;
        }
        let _ = writeln!(
            output,
            "Tank {index:<2} {position:<10} facing {:<7} strength {:<4} {}",
            tank.direction.name(),
            tank.strength,
            tank.status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DamageRules, Wall};

    fn create_test_state() -> MatchState {
        let mut wreck = Tank::new(Coord::new(3, 1), Direction::Top, 100);
        wreck.strength = 0;
        MatchState::new(
            6,
            3,
            vec![
                Tank::new(Coord::new(1, 1), Direction::Right, 100),
                wreck,
                Tank::new(Coord::new(4, 2), Direction::Top, 60),
            ],
            vec![Wall::new(Coord::new(1, 0), 100)],
            DamageRules::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_ascii_basic() {
        let output = render_ascii(&create_test_state(), Some(12));

        assert!(output.contains("Step 12"));
        assert!(output.contains("Tanks alive: 2/3"));
        assert!(output.contains("┌"));
        assert!(output.contains("┘"));
        assert!(output.contains("Legend"));
    }

    #[test]
    fn test_render_rows() {
        let output = render_ascii(&create_test_state(), None);
        let rows: Vec<&str> = output.lines().filter(|l| l.starts_with("│")).collect();

        assert_eq!(rows, vec!["│ . # . . . . │", "│ . > . x . . │", "│ . . . . ^ . │"]);
    }

    #[test]
    fn test_render_tank_stats() {
        let output = render_ascii(&create_test_state(), None);

        assert!(output.contains("Tank 0  (1, 1)     facing right   strength 100  static"));
        assert!(output.contains("Tank 1  (3, 1)     DESTROYED"));
        assert!(output.contains("strength 60 "));
    }

    #[test]
    fn test_tank_glyphs() {
        let pos = Coord::new(0, 0);
        assert_eq!(tank_glyph(&Tank::new(pos, Direction::Top, 1)), '^');
        assert_eq!(tank_glyph(&Tank::new(pos, Direction::Bottom, 1)), 'v');
        assert_eq!(tank_glyph(&Tank::new(pos, Direction::Left, 1)), '<');
        assert_eq!(tank_glyph(&Tank::new(pos, Direction::Right, 1)), '>');
        assert_eq!(tank_glyph(&Tank::new(pos, Direction::Right, 0)), 'x');
    }
}
