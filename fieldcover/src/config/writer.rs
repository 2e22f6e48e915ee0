//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to the commented INI text written to disk.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let output = config
        .telemetry
        .output
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[session]
; Recompute covered/missing area every N ribbon commits (1 = every commit).
; Raise this on slow hardware or for very long application histories.
stats_interval = {}
; Log a warning when one recompute takes longer than this (milliseconds).
stats_budget_ms = {}

[telemetry]
; Emit rates and position after every processed fix.
enabled = {}
; Optional JSON-lines file receiving telemetry records.
output = {}

[logging]
; Directory for log files.
directory = {}
; Log file name (cleared at the start of each session).
file = {}
"#,
        config.session.stats_interval,
        config.session.stats_budget_ms,
        config.telemetry.enabled,
        output,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert path to string, collapsing the home directory to `~`.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_parseable_ini() {
        let text = to_config_string(&ConfigFile::default());
        let ini = ini::Ini::load_from_str(&text).unwrap();

        let session = ini.section(Some("session")).unwrap();
        assert_eq!(session.get("stats_interval"), Some("1"));
        assert_eq!(session.get("stats_budget_ms"), Some("500"));
        assert_eq!(ini.section(Some("telemetry")).unwrap().get("enabled"), Some("true"));
    }

    #[test]
    fn test_home_collapsed_to_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("logs")), "~/logs");
        }
    }
}
