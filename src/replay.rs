//! Match recording and replay.
//!
//! Command resolution is deterministic, so a recording only needs the
//! initial state and the ordered list of commands. To view step N, the
//! commands `0..N` are re-applied to the initial state.
//!
//! # Time Travel
//!
//! - **Forward**: apply the next recorded command
//! - **Backward**: re-run from the initial state to `step - 1`
//! - **Jump to step N**: re-run from the initial state to N

mod render;

pub use render::render_ascii;

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write as IoWrite};
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::TankWars;
use crate::error::EngineError;
use crate::game::{Command, EventKind, MatchEvent, MatchState, TankIndex};
use crate::maze::MazeBuilder;
use crate::random::Randomizer;

/// One command as it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedCommand {
    /// Tank that received the command.
    pub tank: TankIndex,
    /// The command.
    pub command: Command,
}

/// Initial state plus every command applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Seed the match was generated from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// State right after setup.
    pub initial: MatchState,
    /// Commands in the order they were executed.
    #[serde(default)]
    pub commands: Vec<RecordedCommand>,
}

impl Recording {
    /// Start a recording at `initial`.
    #[must_use]
    pub fn new(initial: MatchState) -> Self {
        Self {
            seed: None,
            initial,
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, tank: TankIndex, command: Command) {
        self.commands.push(RecordedCommand { tank, command });
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Save recording to a file as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations or serialization fail.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Load recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid
    /// recording. An initial state that breaks the layout rules is reported
    /// as [`io::ErrorKind::InvalidData`].
    pub fn load(path: &Path) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// State after all recorded commands.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorded command cannot be applied.
    pub fn replay(&self) -> Result<MatchState, ReplayError> {
        self.state_at(self.len())
    }

    /// State after the first `step` commands.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::StepOutOfBounds`] if `step` exceeds the number
    /// of recorded commands, or [`ReplayError::Command`] if a command fails.
    pub fn state_at(&self, step: usize) -> Result<MatchState, ReplayError> {
        Ok(ReplayEngine::new_at_step(self.clone(), step)?.state)
    }
}

/// Error type for replay operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// A recorded command could not be applied.
    Command {
        /// Index of the failing command.
        step: usize,
        /// Error details.
        error: EngineError,
    },
    /// Step number out of bounds.
    StepOutOfBounds {
        /// Requested step.
        requested: usize,
        /// Last valid step (inclusive).
        max_step: usize,
    },
    /// All recorded commands have been applied.
    Finished,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command { step, error } => {
                write!(f, "Recorded command {step} failed: {error}")
            }
            Self::StepOutOfBounds { requested, max_step } => {
                write!(f, "Step {requested} out of bounds (max: {max_step})")
            }
            Self::Finished => write!(f, "Replay is already at the last step"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Replay engine - steps through a recording deterministically.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    /// The recording being replayed.
    recording: Recording,
    /// State after `step` commands.
    state: MatchState,
    /// Number of commands applied.
    step: usize,
}

impl ReplayEngine {
    /// Create a replay engine at the initial state.
    #[must_use]
    pub fn new(recording: Recording) -> Self {
        let state = recording.initial.clone();
        Self {
            recording,
            state,
            step: 0,
        }
    }

    /// Create a replay engine with the first `target_step` commands applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is out of bounds or a command fails.
    pub fn new_at_step(recording: Recording, target_step: usize) -> Result<Self, ReplayError> {
        if target_step > recording.len() {
            return Err(ReplayError::StepOutOfBounds {
                requested: target_step,
                max_step: recording.len(),
            });
        }

        let mut engine = TankWars::from_state(recording.initial.clone());
        for (step, recorded) in recording.commands.iter().take(target_step).enumerate() {
            engine
                .execute_command(recorded.tank, recorded.command)
                .map_err(|error| ReplayError::Command { step, error })?;
        }

        let state = engine.map().cloned().unwrap_or_else(|| recording.initial.clone());
        Ok(Self {
            recording,
            state,
            step: target_step,
        })
    }

    /// Get the recording.
    #[must_use]
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Number of commands applied so far.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Current match state.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Whether every recorded command has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step >= self.recording.len()
    }

    /// Apply the next recorded command.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Finished`] at the last step, or
    /// [`ReplayError::Command`] if the command fails.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        let Some(recorded) = self.recording.commands.get(self.step).copied() else {
            return Err(ReplayError::Finished);
        };
        crate::game::resolve_command(&mut self.state, recorded.tank, recorded.command).map_err(
            |error| ReplayError::Command {
                step: self.step,
                error,
            },
        )?;
        self.step += 1;
        Ok(())
    }

    /// Step backward one command by re-running from the initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if already at the initial state.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.step == 0 {
            return Err(ReplayError::StepOutOfBounds {
                requested: 0,
                max_step: self.recording.len(),
            });
        }
        self.goto_step(self.step - 1)
    }

    /// Jump to a specific step by re-running from the initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the step is out of bounds or a command fails.
    pub fn goto_step(&mut self, target_step: usize) -> Result<(), ReplayError> {
        *self = Self::new_at_step(self.recording.clone(), target_step)?;
        Ok(())
    }

    /// Render current state to ASCII for terminal viewing.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(&self.state, Some(self.step))
    }
}

/// Builds a [`Recording`] from an engine's events.
///
/// Each `newMatch` starts a fresh recording; commands issued before the
/// first `newMatch` after attaching are not captured.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    recording: Rc<RefCell<Option<Recording>>>,
}

impl Recorder {
    /// Register recording listeners on `engine`.
    pub fn attach<R: Randomizer, M: MazeBuilder>(engine: &mut TankWars<R, M>) -> Self {
        let recorder = Self::default();

        let slot = Rc::clone(&recorder.recording);
        engine.on(EventKind::NewMatch, move |event| {
            *slot.borrow_mut() = Some(Recording::new(event.state().clone()));
        });

        let slot = Rc::clone(&recorder.recording);
        engine.on(EventKind::CommandExecuted, move |event| {
            if let MatchEvent::CommandExecuted { tank, command, .. } = *event
                && let Some(recording) = slot.borrow_mut().as_mut()
            {
                recording.push(tank, command);
            }
        });

        recorder
    }

    /// Snapshot of the recording so far, or `None` before the first match.
    #[must_use]
    pub fn recording(&self) -> Option<Recording> {
        self.recording.borrow().clone()
    }
}
