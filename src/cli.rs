//! CLI command implementations for Tank Wars.

pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod simulate;

mod output;

use clap::{Args, ValueEnum};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tankwars::MatchConfig;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// ASCII map and tank table.
    Text,
    /// Match state as JSON.
    Json,
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Match setup flags shared by `run` and `simulate`.
///
/// Flags override values read from `--config`.
#[derive(Args, Debug, Clone)]
pub(crate) struct SetupArgs {
    /// Match config JSON file (keys like `numTanks`, `mapWidth`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of tanks (default: 4)
    #[arg(short = 'n', long)]
    tanks: Option<usize>,

    /// Map width (default: 24)
    #[arg(long)]
    width: Option<u16>,

    /// Map height (default: 12)
    #[arg(long)]
    height: Option<u16>,

    /// Damage a wall deals to a tank (default: 10)
    #[arg(long)]
    wall_damage: Option<u32>,

    /// Damage a tank deals in collisions (default: 20)
    #[arg(long)]
    tank_damage: Option<u32>,
}

impl SetupArgs {
    /// Resolve the match config from the file and flag overrides.
    pub(crate) fn resolve(&self) -> Result<MatchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path).map_err(|e| {
                    CliError::new(format!("Failed to read {}: {e}", path.display()))
                })?;
                serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                    CliError::new(format!("Invalid config {}: {e}", path.display()))
                })?
            }
            None => MatchConfig::default(),
        };

        if let Some(tanks) = self.tanks {
            config.num_tanks = tanks;
        }
        if let Some(width) = self.width {
            config.map_width = width;
        }
        if let Some(height) = self.height {
            config.map_height = height;
        }
        if self.wall_damage.is_some() {
            config.wall_damage = self.wall_damage;
        }
        if self.tank_damage.is_some() {
            config.tank_damage = self.tank_damage;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Use `seed`, or derive one from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos() & u128::from(u64::MAX)).unwrap_or(42))
            .unwrap_or(42)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<tankwars::EngineError> for CliError {
    fn from(e: tankwars::EngineError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<tankwars::replay::ReplayError> for CliError {
    fn from(e: tankwars::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}
