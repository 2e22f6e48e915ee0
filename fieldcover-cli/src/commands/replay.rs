//! Replay command - feed recorded fixes through a tracking session.
//!
//! ```text
//! project.json ─► CoverageSession ◄─ fixes.jsonl (one fix per line)
//!                      │
//!                      ├─► telemetry.jsonl   (optional)
//!                      └─► output.json       (optional, updated protocol)
//! ```

use std::path::PathBuf;
use std::time::Instant;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use fieldcover::stats::to_hectares;
use fieldcover::{CoverageSession, FixReadError, FixReader, Project, TrackingStatus};

use super::common::{
    count_lines, format_elapsed, open_input, open_telemetry_sink, print_stats,
    resolve_session_config, resolve_telemetry_path,
};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub project: PathBuf,
    pub fixes: PathBuf,
    pub output: Option<PathBuf>,
    pub telemetry: Option<PathBuf>,
    pub stats_interval: Option<u32>,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("replay");
    let config = runner.config();

    let project = Project::load_from(&args.project)?;
    let telemetry_path = resolve_telemetry_path(args.telemetry, config);
    let sink = open_telemetry_sink(telemetry_path.as_deref())?;

    let mut session =
        CoverageSession::new(resolve_session_config(args.stats_interval, config)).with_sink(sink);
    session.load_project(project);

    if session.settings().is_none() {
        println!(
            "{} project has no settings, every fix will report zero rates",
            style("warning:").yellow().bold()
        );
    }

    let total_lines = count_lines(&args.fixes)?;
    let progress = ProgressBar::new(total_lines);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| CliError::Progress(e.to_string()))?
            .progress_chars("#>-"),
    );

    let started = Instant::now();
    let mut reader = FixReader::new(open_input(&args.fixes)?);
    let mut malformed = 0usize;
    let mut last_status = session.status();

    while let Some(item) = reader.next() {
        progress.set_position(reader.lines_read() as u64);

        let fix = match item {
            Ok(fix) => fix,
            Err(e @ FixReadError::Parse { .. }) => {
                warn!(line = e.line(), error = %e, "Skipping malformed fix");
                malformed += 1;
                continue;
            }
            Err(e) => {
                progress.abandon();
                return Err(e.into());
            }
        };

        // Rejected fixes are logged and counted by the session.
        let Ok(outcome) = session.process_fix(&fix) else {
            continue;
        };

        if outcome.committed_records > 0 || outcome.status != last_status {
            progress.set_message(format!(
                "{} | L {:.2} R {:.2} | {:.2} ha finished",
                outcome.status,
                outcome.left_rate,
                outcome.right_rate,
                to_hectares(outcome.stats.finished_area_m2)
            ));
            last_status = outcome.status;
        }
    }
    progress.finish_and_clear();

    let committed_at_stop = session.stop();
    let elapsed = started.elapsed();

    let snapshot = session.metrics().snapshot();
    info!(
        lines = reader.lines_read(),
        malformed,
        committed_at_stop,
        elapsed_ms = elapsed.as_millis() as u64,
        "Replay finished"
    );

    println!(
        "Replayed {} lines in {}",
        reader.lines_read(),
        format_elapsed(elapsed)
    );
    if malformed > 0 {
        println!("  {} malformed lines skipped", malformed);
    }
    if session.status() == TrackingStatus::NoProject {
        println!("  No settings were available during the replay");
    }
    println!();
    println!("{}", snapshot);
    println!();
    print_stats(&session.stats());

    if let Some(path) = &telemetry_path {
        println!();
        println!("Telemetry written to {}", path.display());
    }

    match &args.output {
        Some(output) => {
            session.export().save_to(output)?;
            println!("Project written to {}", output.display());
        }
        None => {
            println!();
            println!("No --output given, the updated protocol was not saved.");
        }
    }

    Ok(())
}
