//! Simulate command implementation.

// Throughput display
#![allow(clippy::cast_precision_loss)]

use super::output::{
    JsonSimulationResult, SimulationStats, format_simulation_csv, format_simulation_text,
};
use super::{CliError, SimulateFormat};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;
use tankwars::MatchConfig;
use tankwars::simulate::{SimulationConfig, run_match};
use tracing::{info, warn};

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the thread pool or progress bar cannot be set up,
/// or the results cannot be serialized.
pub(crate) fn execute(
    setup: MatchConfig,
    matches: u64,
    base_seed: u64,
    threads: Option<usize>,
    max_turns: u32,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| CliError::new(format!("Failed to set up thread pool: {e}")))?;
    }

    let config = SimulationConfig { setup, max_turns };
    info!(matches, base_seed, max_turns, "starting simulation");

    let pb = if progress {
        let pb = ProgressBar::new(matches);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let num_tanks = setup.num_tanks;

    // Each thread accumulates into its own SimulationStats, then we merge at the end
    let stats = (0..matches)
        .into_par_iter()
        .fold(
            || SimulationStats::new(num_tanks),
            |mut local_stats, i| {
                let seed = base_seed.wrapping_add(i);
                match run_match(seed, &config) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => {
                        warn!(seed, error = %e, "match setup failed");
                        local_stats.add_failure();
                    }
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || SimulationStats::new(num_tanks),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let matches_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.matches_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };
    info!(
        played = stats.matches_played,
        failed = stats.failed,
        seconds = duration.as_secs_f64(),
        "simulation finished"
    );

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_simulation_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({matches_per_sec:.0} matches/sec)",
                duration.as_secs_f64()
            );
        }
        SimulateFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSimulationResult::from_stats(&stats))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_simulation_csv(&stats));
        }
    }

    Ok(())
}
