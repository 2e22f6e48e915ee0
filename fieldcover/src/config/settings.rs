//! Configuration sections and their defaults.

use std::path::PathBuf;

/// Commit batches between coverage stats recomputes.
pub const DEFAULT_STATS_INTERVAL: u32 = 1;

/// Recompute duration that triggers a warning, in milliseconds.
pub const DEFAULT_STATS_BUDGET_MS: u64 = 500;

/// Log directory name below the config directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Log file name.
pub const DEFAULT_LOG_FILE: &str = "fieldcover.log";

/// Contents of `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    /// `[session]`
    pub session: SessionSettings,
    /// `[telemetry]`
    pub telemetry: TelemetrySettings,
    /// `[logging]`
    pub logging: LoggingSettings,
}

/// `[session]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Recompute coverage stats every N commit batches.
    pub stats_interval: u32,
    /// Warn when a recompute takes longer than this.
    pub stats_budget_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            stats_interval: DEFAULT_STATS_INTERVAL,
            stats_budget_ms: DEFAULT_STATS_BUDGET_MS,
        }
    }
}

/// `[telemetry]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySettings {
    /// Emit per-fix telemetry.
    pub enabled: bool,
    /// JSON-lines output file. Unset means no file output.
    pub output: Option<PathBuf>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files.
    pub directory: PathBuf,
    /// Log file name inside `directory`.
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: super::config_directory().join(DEFAULT_LOG_DIRECTORY),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
