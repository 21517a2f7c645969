//! Replay command implementation.

use super::{CliError, ReplayFormat};
use std::path::Path;
use tankwars::replay::{Recording, ReplayEngine, ReplayError};

/// Execute the replay command.
///
/// Without `--step` the final state is shown; `--all` prints every step.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: &Path,
    format: ReplayFormat,
    step: Option<usize>,
    all: bool,
) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    if all {
        return print_all_steps(ReplayEngine::new(recording), format);
    }

    let target = step.unwrap_or_else(|| recording.len());
    let engine = ReplayEngine::new_at_step(recording, target)?;
    print_step(&engine, format)
}

fn print_step(engine: &ReplayEngine, format: ReplayFormat) -> Result<(), CliError> {
    match format {
        ReplayFormat::Text => println!("{}", engine.render_ascii()),
        ReplayFormat::Json => println!("{}", serde_json::to_string_pretty(engine.state())?),
    }
    Ok(())
}

fn print_all_steps(mut engine: ReplayEngine, format: ReplayFormat) -> Result<(), CliError> {
    if format == ReplayFormat::Text {
        match engine.recording().seed {
            Some(seed) => println!("Replay of match (seed: {seed})"),
            None => println!("Replay of match"),
        }
        println!("Commands: {}", engine.recording().len());
        println!();
    }

    loop {
        if format == ReplayFormat::Text {
            println!("=== Step {} ===", engine.step());
        }
        print_step(&engine, format)?;
        if format == ReplayFormat::Text
            && let Some((tank, command)) = step_command(&engine)
        {
            println!("next: tank {tank} {command}");
            println!();
        }

        match engine.step_forward() {
            Ok(()) => {}
            Err(ReplayError::Finished) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if format == ReplayFormat::Text {
        println!("=== END ===");
    }
    Ok(())
}

fn step_command(engine: &ReplayEngine) -> Option<(usize, tankwars::Command)> {
    engine
        .recording()
        .commands
        .get(engine.step())
        .map(|recorded| (recorded.tank, recorded.command))
}
