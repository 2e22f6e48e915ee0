//! Telemetry record emitted after every processed fix.

use serde::{Deserialize, Serialize};

use crate::model::Fix;

/// Rates and vehicle state for one fix.
///
/// Serialized with camelCase keys for remote monitoring consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    /// Rate on the left side.
    pub left_rate: f64,
    /// Rate on the right side.
    pub right_rate: f64,
    /// Vehicle longitude in degrees.
    pub longitude: f64,
    /// Vehicle latitude in degrees.
    pub latitude: f64,
    /// Ground speed in m/s.
    pub speed: f64,
    /// Heading in degrees, `null` when unknown.
    pub heading: Option<f64>,
}

impl TelemetryRecord {
    /// Build a record from a validated fix and the decided rates.
    pub fn from_fix(fix: &Fix, left_rate: f64, right_rate: f64) -> Self {
        Self {
            left_rate,
            right_rate,
            longitude: fix.longitude,
            latitude: fix.latitude,
            speed: fix.speed_mps,
            heading: fix.heading_deg,
        }
    }
}
