//! Run command implementation.

use super::output::{JsonMatchResult, format_text};
use super::{CliError, OutputFormat};
use std::path::Path;
use tankwars::MatchConfig;
use tankwars::replay::render_ascii;
use tankwars::simulate::{SimulationConfig, run_match, run_match_recorded};
use tracing::info;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match cannot be set up or the recording cannot
/// be saved.
pub(crate) fn execute(
    setup: MatchConfig,
    seed: u64,
    turns: u32,
    format: OutputFormat,
    save: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = SimulationConfig {
        setup,
        max_turns: turns,
    };

    if !quiet && format == OutputFormat::Text {
        println!("Running match with seed {seed}...");
        println!(
            "Tanks: {}  Map: {}x{}",
            setup.num_tanks, setup.map_width, setup.map_height
        );
        println!();
    }
    info!(seed, turns, "running match");

    // Run the match, keeping the recording only when it is saved
    let result = match save {
        Some(save_path) => {
            let (result, recording) = run_match_recorded(seed, &config)?;
            recording.save(save_path).map_err(|e| {
                CliError::new(format!("Failed to save recording: {e}"))
            })?;
            if !quiet && format == OutputFormat::Text {
                println!("Recording saved to: {}", save_path.display());
                println!();
            }
            result
        }
        None => run_match(seed, &config)?,
    };

    match format {
        OutputFormat::Text => {
            if !quiet {
                println!("{}", render_ascii(&result.final_state, None));
            }
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonMatchResult::from_match_result(&result))?;
            println!("{json}");
        }
    }

    Ok(())
}
