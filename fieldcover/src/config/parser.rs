//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [session] section
    if let Some(section) = ini.section(Some("session")) {
        if let Some(v) = section.get("stats_interval") {
            config.session.stats_interval = parse_positive(v).ok_or_else(|| {
                invalid("session", "stats_interval", v, "must be a positive integer")
            })? as u32;
        }
        if let Some(v) = section.get("stats_budget_ms") {
            config.session.stats_budget_ms = parse_positive(v).ok_or_else(|| {
                invalid("session", "stats_budget_ms", v, "must be a positive integer")
            })?;
        }
    }

    // [telemetry] section
    if let Some(section) = ini.section(Some("telemetry")) {
        if let Some(v) = section.get("enabled") {
            config.telemetry.enabled = parse_bool(v)
                .ok_or_else(|| invalid("telemetry", "enabled", v, "must be true or false"))?;
        }
        if let Some(v) = section.get("output") {
            let v = v.trim();
            config.telemetry.output = if v.is_empty() {
                None
            } else {
                Some(expand_tilde(v))
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid("logging", "file", v, "must be a plain file name"));
            }
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

/// Parse a positive integer that fits in `u32`.
pub(super) fn parse_positive(value: &str) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0 && *v <= u64::from(u32::MAX))
}

/// Parse a boolean written as true/false, yes/no, on/off or 1/0.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
