//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`init`] - Configuration initialization
//! - [`replay`] - Replay recorded fixes through a session
//! - [`stats`] - Coverage of a project file

pub mod common;
pub mod config;
pub mod init;
pub mod replay;
pub mod stats;
