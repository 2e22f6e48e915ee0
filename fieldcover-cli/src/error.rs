//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use fieldcover::config::ConfigFileError;
use fieldcover::{FixReadError, ProjectError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Project file could not be loaded or saved
    Project(ProjectError),
    /// Fix recording could not be read
    FixRead(FixReadError),
    /// Failed to open an input file
    FileOpen { path: PathBuf, error: std::io::Error },
    /// Failed to create or write an output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Progress display could not be set up
    Progress(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Project(ProjectError::InvalidGeometry { .. })
            | CliError::Project(ProjectError::InvalidProperty { .. }) => {
                eprintln!();
                eprintln!("The project file must hold GeoJSON FeatureCollections under");
                eprintln!("'boundaries', 'plan' and optionally 'protocol'.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'fieldcover config list' to see available keys.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Project(e) => write!(f, "Project error: {}", e),
            CliError::FixRead(e) => write!(f, "Fix recording error: {}", e),
            CliError::FileOpen { path, error } => {
                write!(f, "Failed to open '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Progress(msg) => write!(f, "Failed to set up progress display: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Project(e) => Some(e),
            CliError::FixRead(e) => Some(e),
            CliError::FileOpen { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ProjectError> for CliError {
    fn from(e: ProjectError) -> Self {
        CliError::Project(e)
    }
}

impl From<FixReadError> for CliError {
    fn from(e: FixReadError) -> Self {
        CliError::FixRead(e)
    }
}
