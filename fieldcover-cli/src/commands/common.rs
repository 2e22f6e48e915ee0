//! Common types and utilities shared across CLI commands.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use fieldcover::config::ConfigFile;
use fieldcover::stats::to_hectares;
use fieldcover::telemetry::{JsonLinesSink, NullSink, TelemetrySink};
use fieldcover::{CoverageStats, SessionConfig};

use crate::error::CliError;

/// Resolve session options from CLI args and config.
pub fn resolve_session_config(cli_stats_interval: Option<u32>, config: &ConfigFile) -> SessionConfig {
    let base = SessionConfig::from(config);
    match cli_stats_interval {
        Some(interval) => base.with_stats_interval(interval),
        None => base,
    }
}

/// Resolve the telemetry output file from CLI args and config.
///
/// An explicit CLI path always wins; otherwise the config path is used
/// when telemetry is enabled.
pub fn resolve_telemetry_path(cli_path: Option<PathBuf>, config: &ConfigFile) -> Option<PathBuf> {
    cli_path.or_else(|| {
        if config.telemetry.enabled {
            config.telemetry.output.clone()
        } else {
            None
        }
    })
}

/// Open the telemetry sink for a replay.
pub fn open_telemetry_sink(path: Option<&Path>) -> Result<Box<dyn TelemetrySink>, CliError> {
    let Some(path) = path else {
        return Ok(Box::new(NullSink));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|error| CliError::FileWrite {
            path: parent.to_path_buf(),
            error,
        })?;
    }

    let file = File::create(path).map_err(|error| CliError::FileWrite {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(Box::new(JsonLinesSink::new(BufWriter::new(file))))
}

/// Open an input file for buffered reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>, CliError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|error| CliError::FileOpen {
            path: path.to_path_buf(),
            error,
        })
}

/// Count lines in an input file, used to size the progress bar.
pub fn count_lines(path: &Path) -> Result<u64, CliError> {
    let mut count = 0;
    for line in open_input(path)?.lines() {
        line.map_err(|error| CliError::FileOpen {
            path: path.to_path_buf(),
            error,
        })?;
        count += 1;
    }
    Ok(count)
}

/// Print coverage stats in hectares.
pub fn print_stats(stats: &CoverageStats) {
    println!("{}", style("Coverage").bold().underlined());
    println!("  Total:    {:>10.2} ha", to_hectares(stats.total_area_m2));
    println!(
        "  Finished: {:>10.2} ha ({:.1}%)",
        to_hectares(stats.finished_area_m2),
        stats.finished_fraction() * 100.0
    );
    println!("  Missing:  {:>10.2} ha", to_hectares(stats.missing_area_m2));
}

/// Format a duration as seconds with one decimal.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_stats_interval_overrides_config() {
        let config = ConfigFile::default();
        assert_eq!(resolve_session_config(Some(7), &config).stats_interval, 7);
        assert_eq!(
            resolve_session_config(None, &config).stats_interval,
            config.session.stats_interval
        );
    }

    #[test]
    fn test_telemetry_path_precedence() {
        let mut config = ConfigFile::default();
        config.telemetry.output = Some(PathBuf::from("/data/telemetry.jsonl"));

        assert_eq!(
            resolve_telemetry_path(Some(PathBuf::from("cli.jsonl")), &config),
            Some(PathBuf::from("cli.jsonl"))
        );
        assert_eq!(
            resolve_telemetry_path(None, &config),
            Some(PathBuf::from("/data/telemetry.jsonl"))
        );

        config.telemetry.enabled = false;
        assert_eq!(resolve_telemetry_path(None, &config), None);
    }

    #[test]
    fn test_telemetry_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("telemetry.jsonl");

        let mut sink = open_telemetry_sink(Some(&path)).unwrap();
        sink.flush().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_count_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixes.jsonl");
        std::fs::write(&path, "{}\n\n{}\n").unwrap();

        assert_eq!(count_lines(&path).unwrap(), 3);
        assert!(matches!(
            count_lines(&dir.path().join("missing.jsonl")),
            Err(CliError::FileOpen { .. })
        ));
    }
}
