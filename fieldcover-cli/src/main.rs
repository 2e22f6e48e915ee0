//! FieldCover CLI - Command-line interface
//!
//! Replays recorded GPS fixes against a project file and manages the
//! configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;

#[derive(Parser)]
#[command(name = "fieldcover")]
#[command(version, about = "As-applied coverage tracking for two-sided spreaders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configuration file with default values
    Init,

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Replay recorded fixes through a tracking session
    Replay {
        /// Project file (boundaries, plan, protocol, settings)
        #[arg(long)]
        project: PathBuf,

        /// Recorded fixes, one JSON object per line
        #[arg(long)]
        fixes: PathBuf,

        /// Write the updated project here when the replay ends
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write telemetry as JSON lines to this file (overrides config)
        #[arg(long)]
        telemetry: Option<PathBuf>,

        /// Recompute coverage stats every N commits (overrides config)
        #[arg(long)]
        stats_interval: Option<u32>,
    },

    /// Show field coverage for a project file
    Stats {
        /// Project file to analyze
        #[arg(long)]
        project: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
        Commands::Replay {
            project,
            fixes,
            output,
            telemetry,
            stats_interval,
        } => commands::replay::run(ReplayArgs {
            project,
            fixes,
            output,
            telemetry,
            stats_interval,
        }),
        Commands::Stats { project } => commands::stats::run(&project),
    };

    if let Err(e) = result {
        e.exit();
    }
}
