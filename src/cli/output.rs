//! Output formatting utilities for CLI.

// Averages over match counts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use std::fmt::Write as _;
use tankwars::simulate::MatchResult;
use tankwars::{MatchState, TankStatus};

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult<'a> {
    /// Random seed used.
    seed: u64,
    /// Winning tank index (null if none or several survive).
    winner: Option<usize>,
    /// Total turns played.
    turns_played: u32,
    /// Total commands executed.
    commands_issued: u64,
    /// Walls knocked down.
    walls_destroyed: usize,
    /// Final state snapshot.
    final_state: &'a MatchState,
}

impl<'a> JsonMatchResult<'a> {
    /// Create from a `MatchResult`.
    pub(super) fn from_match_result(result: &'a MatchResult) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            turns_played: result.turns_played,
            commands_issued: result.commands_issued,
            walls_destroyed: result.walls_destroyed,
            final_state: &result.final_state,
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {})", result.seed);
    match result.winner {
        Some(winner) => {
            let _ = writeln!(output, "  Winner: Tank {winner}");
        }
        None if result.survivors == 0 => output.push_str("  Winner: none (all destroyed)\n"),
        None => {
            let _ = writeln!(output, "  Winner: undecided ({} survivors)", result.survivors);
        }
    }
    let _ = writeln!(output, "  Turns: {}", result.turns_played);
    let _ = writeln!(output, "  Commands: {}", result.commands_issued);
    let _ = writeln!(output, "  Walls destroyed: {}\n", result.walls_destroyed);

    for (i, tank) in result.final_state.tanks().iter().enumerate() {
        let _ = write!(output, "  Tank {i}: strength {:<4}", tank.strength);
        if tank.is_destroyed() {
            output.push_str(" [destroyed]");
        } else if tank.status != TankStatus::Static {
            let _ = write!(output, " [{}]", tank.status);
        }
        output.push('\n');
    }

    output
}

/// Simulation statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct SimulationStats {
    /// Total matches played.
    pub(super) matches_played: u64,
    /// Matches that failed to set up.
    pub(super) failed: u64,
    /// Win count per tank index.
    pub(super) wins: Vec<u64>,
    /// Matches with every tank destroyed.
    pub(super) wipeouts: u64,
    /// Matches stopped at the turn limit with several survivors.
    pub(super) undecided: u64,
    /// Total turns across all matches.
    total_turns: u64,
    /// Total commands across all matches.
    total_commands: u64,
    /// Total walls destroyed across all matches.
    total_walls_destroyed: u64,
}

impl SimulationStats {
    /// Create new stats for n tanks.
    pub(super) fn new(num_tanks: usize) -> Self {
        Self {
            wins: vec![0; num_tanks],
            ..Self::default()
        }
    }

    /// Add a match result to the stats.
    pub(super) fn add_result(&mut self, result: &MatchResult) {
        self.matches_played += 1;
        self.total_turns += u64::from(result.turns_played);
        self.total_commands += result.commands_issued;
        self.total_walls_destroyed += u64::try_from(result.walls_destroyed).unwrap_or(u64::MAX);

        match result.winner {
            Some(winner) => {
                if let Some(wins) = self.wins.get_mut(winner) {
                    *wins += 1;
                }
            }
            None if result.survivors == 0 => self.wipeouts += 1,
            None => self.undecided += 1,
        }
    }

    /// Record a match that could not be played.
    pub(super) fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Merge stats accumulated on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.matches_played += other.matches_played;
        self.failed += other.failed;
        self.wipeouts += other.wipeouts;
        self.undecided += other.undecided;
        self.total_turns += other.total_turns;
        self.total_commands += other.total_commands;
        self.total_walls_destroyed += other.total_walls_destroyed;

        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (mine, theirs) in self.wins.iter_mut().zip(&other.wins) {
            *mine += theirs;
        }
    }

    /// Get win rate for a tank index (0.0-1.0).
    pub(super) fn win_rate(&self, tank: usize) -> f64 {
        self.per_match(self.wins.get(tank).copied().unwrap_or(0))
    }

    /// Get average match length.
    pub(super) fn avg_turns(&self) -> f64 {
        self.per_match(self.total_turns)
    }

    /// Get average commands per match.
    pub(super) fn avg_commands(&self) -> f64 {
        self.per_match(self.total_commands)
    }

    /// Get average walls destroyed per match.
    pub(super) fn avg_walls_destroyed(&self) -> f64 {
        self.per_match(self.total_walls_destroyed)
    }

    fn per_match(&self, total: u64) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        total as f64 / self.matches_played as f64
    }
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    /// Total matches played.
    matches_played: u64,
    /// Matches that failed to set up.
    failed: u64,
    /// Per-tank statistics.
    tanks: Vec<JsonTankStats>,
    /// Matches with every tank destroyed.
    wipeouts: u64,
    /// Matches stopped at the turn limit.
    undecided: u64,
    /// Average match length in turns.
    avg_turns: f64,
    /// Average commands per match.
    avg_commands: f64,
    /// Average walls destroyed per match.
    avg_walls_destroyed: f64,
}

/// JSON-serializable per-tank stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTankStats {
    /// Tank index.
    tank: usize,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
}

impl JsonSimulationResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &SimulationStats) -> Self {
        let tanks = stats
            .wins
            .iter()
            .enumerate()
            .map(|(tank, &wins)| JsonTankStats {
                tank,
                wins,
                win_rate: stats.win_rate(tank),
            })
            .collect();

        Self {
            matches_played: stats.matches_played,
            failed: stats.failed,
            tanks,
            wipeouts: stats.wipeouts,
            undecided: stats.undecided,
            avg_turns: stats.avg_turns(),
            avg_commands: stats.avg_commands(),
            avg_walls_destroyed: stats.avg_walls_destroyed(),
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(stats: &SimulationStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results ({} matches)", stats.matches_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, wins) in stats.wins.iter().enumerate() {
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(output, "  Tank {i}: {rate:.1}% ({wins} wins)");
    }
    let _ = writeln!(
        output,
        "  Wipeouts: {} ({:.1}%)",
        stats.wipeouts,
        stats.per_match(stats.wipeouts) * 100.0
    );
    let _ = writeln!(
        output,
        "  Undecided: {} ({:.1}%)\n",
        stats.undecided,
        stats.per_match(stats.undecided) * 100.0
    );

    let _ = writeln!(output, "Average Match Length: {:.0} turns", stats.avg_turns());
    let _ = writeln!(output, "Average Commands: {:.0}", stats.avg_commands());
    let _ = writeln!(output, "Average Walls Destroyed: {:.1}", stats.avg_walls_destroyed());
    if stats.failed > 0 {
        let _ = writeln!(output, "Failed Setups: {}", stats.failed);
    }

    output
}

/// Format simulation stats as CSV.
pub(super) fn format_simulation_csv(stats: &SimulationStats) -> String {
    let mut output = String::new();

    // Header
    output.push_str("tank,wins,win_rate\n");

    // Data rows
    for (i, wins) in stats.wins.iter().enumerate() {
        let _ = writeln!(output, "{i},{wins},{:.4}", stats.win_rate(i));
    }

    output
}
