//! Configuration key access and validation.
//!
//! Type-safe get/set of configuration values by `section.key` name, used
//! by the `config` command.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use super::parser::{expand_tilde, parse_bool, parse_positive};
use super::settings::ConfigFile;
use super::writer::path_to_string;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Session settings
    SessionStatsInterval,
    SessionStatsBudgetMs,

    // Telemetry settings
    TelemetryEnabled,
    TelemetryOutput,

    // Logging settings
    LoggingDirectory,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::SessionStatsInterval,
            ConfigKey::SessionStatsBudgetMs,
            ConfigKey::TelemetryEnabled,
            ConfigKey::TelemetryOutput,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingFile,
        ]
    }

    /// Canonical key name (e.g., "session.stats_interval").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::SessionStatsInterval => "session.stats_interval",
            ConfigKey::SessionStatsBudgetMs => "session.stats_budget_ms",
            ConfigKey::TelemetryEnabled => "telemetry.enabled",
            ConfigKey::TelemetryOutput => "telemetry.output",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section name (e.g., "session").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Key name within the section (e.g., "stats_interval").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Value from a config file as a string. Unset values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::SessionStatsInterval => config.session.stats_interval.to_string(),
            ConfigKey::SessionStatsBudgetMs => config.session.stats_budget_ms.to_string(),
            ConfigKey::TelemetryEnabled => config.telemetry.enabled.to_string(),
            ConfigKey::TelemetryOutput => config
                .telemetry
                .output
                .as_ref()
                .map(|p| path_to_string(p))
                .unwrap_or_default(),
            ConfigKey::LoggingDirectory => path_to_string(&config.logging.directory),
            ConfigKey::LoggingFile => config.logging.file.clone(),
        }
    }

    /// Validate and set a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let failed = |reason: &str| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::SessionStatsInterval => {
                let v = parse_positive(value).ok_or_else(|| failed("must be a positive integer"))?;
                config.session.stats_interval = v as u32;
            }
            ConfigKey::SessionStatsBudgetMs => {
                config.session.stats_budget_ms =
                    parse_positive(value).ok_or_else(|| failed("must be a positive integer"))?;
            }
            ConfigKey::TelemetryEnabled => {
                config.telemetry.enabled =
                    parse_bool(value).ok_or_else(|| failed("must be true or false"))?;
            }
            ConfigKey::TelemetryOutput => {
                config.telemetry.output = optional_path(value);
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory =
                    optional_path(value).ok_or_else(|| failed("must not be empty"))?;
            }
            ConfigKey::LoggingFile => {
                let value = value.trim();
                if value.is_empty() || value.contains(['/', '\\']) {
                    return Err(failed("must be a plain file name"));
                }
                config.logging.file = value.to_string();
            }
        }
        Ok(())
    }
}

/// Empty string to None, otherwise a tilde-expanded path.
fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(expand_tilde(value))
    }
}
