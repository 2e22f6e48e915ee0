//! User configuration stored in `~/.fieldcover/config.ini`.
//!
//! - [`ConfigFile`]: typed view of the INI file with defaults
//! - [`ConfigKey`]: `section.key` access for the `config` command
//!
//! Parsing lives in `parser`, serialization in `writer`.

mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    ConfigFile, LoggingSettings, SessionSettings, TelemetrySettings, DEFAULT_LOG_DIRECTORY,
    DEFAULT_LOG_FILE, DEFAULT_STATS_BUDGET_MS, DEFAULT_STATS_INTERVAL,
};
