//! CLI runner for common setup.
//!
//! Loads the config file and initializes logging once for commands that
//! drive a tracking session.

use tracing::info;

use fieldcover::config::ConfigFile;
use fieldcover::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (defaults when no file exists) and initialize logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("FieldCover v{}", fieldcover::VERSION);
        info!(
            command,
            log_file = %self.logging_guard.path().display(),
            "FieldCover CLI started"
        );
    }
}
