//! Application settings supplied with a project.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A settings value that cannot drive rate decisions.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid setting {name} = {value} (must be finite and non-negative)")]
pub struct SettingsError {
    /// Setting name as it appears in the project file.
    pub name: &'static str,
    /// Offending value.
    pub value: f64,
}

/// Spreading parameters for a session.
///
/// Serialized with the project file key names. Unknown keys in the
/// imported settings object are kept in `extra` and written back on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Speed below which both sides stop applying (m/s).
    #[serde(serialize_with = "super::number::serialize")]
    pub min_speed: f64,
    /// Lateral reach of the spreader in millimeters.
    #[serde(serialize_with = "super::number::serialize")]
    pub throwing_range: f64,
    /// Rate applied in bounds when no prescription zone overrides it.
    #[serde(serialize_with = "super::number::serialize")]
    pub default_rate: f64,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Create settings without extra keys.
    pub fn new(min_speed: f64, throwing_range_mm: f64, default_rate: f64) -> Self {
        Self {
            min_speed,
            throwing_range: throwing_range_mm,
            default_rate,
            extra: Map::new(),
        }
    }

    /// Throwing range in meters.
    pub fn throwing_range_m(&self) -> f64 {
        self.throwing_range * 1e-3
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("min_speed", self.min_speed),
            ("throwing_range", self.throwing_range),
            ("default_rate", self.default_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throwing_range_in_meters() {
        let settings = Settings::new(0.5, 20_000.0, 1.0);
        assert_eq!(settings.throwing_range_m(), 20.0);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let settings = Settings::new(0.5, -1.0, 1.0);
        let err = settings.validate().unwrap_err();
        assert_eq!(err.name, "throwing_range");
    }

    #[test]
    fn test_validate_rejects_nan() {
        let settings = Settings::new(f64::NAN, 1.0, 1.0);
        assert_eq!(settings.validate().unwrap_err().name, "min_speed");
    }

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let json = r#"{"min_speed":0.5,"throwing_range":24000,"default_rate":0.8,"operator":"north"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.extra.get("operator"), Some(&Value::from("north")));

        let back: Value = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["operator"], "north");
        assert_eq!(back["throwing_range"], 24000);
        assert_eq!(back["default_rate"], 0.8);
    }
}
