//! Tank Wars CLI - run, replay and simulate tank battles.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Tank Wars - a deterministic grid tank combat engine
#[derive(Parser, Debug)]
#[command(name = "tankwars")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single seeded match with randomly driven tanks
    Run {
        #[command(flatten)]
        setup: cli::SetupArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: 500)
        #[arg(short, long, default_value = "500")]
        turns: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress the map and progress lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ReplayFormat,

        /// Show the state after N commands (default: last)
        #[arg(short, long, conflicts_with = "all")]
        step: Option<usize>,

        /// Print every step
        #[arg(short, long)]
        all: bool,
    },

    /// Run many seeded matches in parallel and aggregate statistics
    Simulate {
        #[command(flatten)]
        setup: cli::SetupArgs,

        /// Number of matches to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        matches: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per match (default: 500)
        #[arg(short = 't', long, default_value = "500")]
        max_turns: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging disabled: {e}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Run {
            setup,
            seed,
            turns,
            format,
            save,
            quiet,
        } => setup.resolve().and_then(|config| {
            cli::run::execute(
                config,
                cli::resolve_seed(seed),
                turns,
                format,
                save.as_deref(),
                quiet,
            )
        }),

        Commands::Replay {
            recording,
            format,
            step,
            all,
        } => cli::replay::execute(&recording, format, step, all),

        Commands::Simulate {
            setup,
            matches,
            seed,
            threads,
            max_turns,
            format,
            progress,
        } => setup.resolve().and_then(|config| {
            cli::simulate::execute(
                config,
                matches,
                cli::resolve_seed(seed),
                threads,
                max_turns,
                format,
                progress,
            )
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
