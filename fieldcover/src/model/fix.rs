//! Position fixes from the geolocation source.

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a fix is rejected before any state is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FixError {
    /// Latitude is not finite or outside [-90, 90].
    #[error("Invalid latitude: {0} (must be finite and within -90..=90)")]
    InvalidLatitude(f64),

    /// Longitude is not finite or outside [-180, 180].
    #[error("Invalid longitude: {0} (must be finite and within -180..=180)")]
    InvalidLongitude(f64),

    /// Speed is not finite or negative.
    #[error("Invalid speed: {0} m/s (must be finite and non-negative)")]
    InvalidSpeed(f64),

    /// Reported accuracy is not finite or negative.
    #[error("Invalid horizontal accuracy: {0} m (must be finite and non-negative)")]
    InvalidAccuracy(f64),
}

/// One timestamped GPS observation.
///
/// `heading_deg` is `None` when the device cannot determine the direction
/// of travel, which is typical while stationary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Direction of travel in degrees clockwise from north.
    #[serde(default, alias = "heading")]
    pub heading_deg: Option<f64>,
    /// Ground speed in meters per second.
    #[serde(alias = "speed")]
    pub speed_mps: f64,
    /// Horizontal accuracy radius in meters.
    #[serde(default, alias = "accuracy")]
    pub accuracy_m: Option<f64>,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    /// Create a fix without heading or accuracy.
    pub fn new(latitude: f64, longitude: f64, speed_mps: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            heading_deg: None,
            speed_mps,
            accuracy_m: None,
            timestamp,
        }
    }

    /// Set the heading.
    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = Some(heading_deg);
        self
    }

    /// Set the horizontal accuracy.
    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    /// Position as a lon/lat point.
    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Timestamp as fractional Unix seconds.
    pub fn unix_seconds(&self) -> f64 {
        self.timestamp.timestamp_millis() as f64 / 1e3
    }

    /// Check the fix and return a normalized copy.
    ///
    /// A non-finite heading is treated as absent; a finite one is folded
    /// into [0, 360).
    pub fn validated(&self) -> Result<Fix, FixError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FixError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FixError::InvalidLongitude(self.longitude));
        }
        if !self.speed_mps.is_finite() || self.speed_mps < 0.0 {
            return Err(FixError::InvalidSpeed(self.speed_mps));
        }
        if let Some(accuracy) = self.accuracy_m {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(FixError::InvalidAccuracy(accuracy));
            }
        }

        let heading_deg = self
            .heading_deg
            .filter(|h| h.is_finite())
            .map(|h| h.rem_euclid(360.0));

        Ok(Fix {
            heading_deg,
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_fix_passes() {
        let fix = Fix::new(47.32, 8.2, 2.0, at_noon()).with_heading(45.0);
        let checked = fix.validated().unwrap();
        assert_eq!(checked.heading_deg, Some(45.0));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let fix = Fix::new(f64::NAN, 8.2, 2.0, at_noon());
        assert!(matches!(fix.validated(), Err(FixError::InvalidLatitude(_))));

        let fix = Fix::new(47.32, f64::INFINITY, 2.0, at_noon());
        assert!(matches!(
            fix.validated(),
            Err(FixError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        assert!(Fix::new(91.0, 8.2, 1.0, at_noon()).validated().is_err());
        assert!(Fix::new(47.0, -181.0, 1.0, at_noon()).validated().is_err());
    }

    #[test]
    fn test_negative_speed_rejected() {
        let fix = Fix::new(47.32, 8.2, -0.1, at_noon());
        assert_eq!(fix.validated(), Err(FixError::InvalidSpeed(-0.1)));
    }

    #[test]
    fn test_negative_accuracy_rejected() {
        let fix = Fix::new(47.32, 8.2, 1.0, at_noon()).with_accuracy(-3.0);
        assert_eq!(fix.validated(), Err(FixError::InvalidAccuracy(-3.0)));
    }

    #[test]
    fn test_nan_heading_becomes_absent() {
        let fix = Fix::new(47.32, 8.2, 0.0, at_noon()).with_heading(f64::NAN);
        assert_eq!(fix.validated().unwrap().heading_deg, None);
    }

    #[test]
    fn test_heading_is_normalized() {
        let fix = Fix::new(47.32, 8.2, 1.0, at_noon()).with_heading(-90.0);
        assert_eq!(fix.validated().unwrap().heading_deg, Some(270.0));

        let fix = Fix::new(47.32, 8.2, 1.0, at_noon()).with_heading(720.0);
        assert_eq!(fix.validated().unwrap().heading_deg, Some(0.0));
    }

    #[test]
    fn test_position_is_lon_lat() {
        let fix = Fix::new(47.32, 8.2, 1.0, at_noon());
        assert_eq!(fix.position().x(), 8.2);
        assert_eq!(fix.position().y(), 47.32);
    }

    #[test]
    fn test_unix_seconds() {
        let fix = Fix::new(47.32, 8.2, 1.0, at_noon());
        assert_eq!(fix.unix_seconds(), at_noon().timestamp() as f64);
    }

    #[test]
    fn test_deserialize_short_field_names() {
        let json = r#"{"latitude":47.32,"longitude":8.2,"heading":10.0,"speed":2.5,
                       "accuracy":4.0,"timestamp":"2024-04-02T12:00:00Z"}"#;
        let fix: Fix = serde_json::from_str(json).unwrap();
        assert_eq!(fix.heading_deg, Some(10.0));
        assert_eq!(fix.speed_mps, 2.5);
        assert_eq!(fix.accuracy_m, Some(4.0));
        assert_eq!(fix.timestamp, at_noon());
    }

    #[test]
    fn test_deserialize_missing_heading() {
        let json = r#"{"latitude":47.32,"longitude":8.2,"speed_mps":0.0,
                       "timestamp":"2024-04-02T12:00:00Z"}"#;
        let fix: Fix = serde_json::from_str(json).unwrap();
        assert!(fix.heading_deg.is_none());
        assert!(fix.accuracy_m.is_none());
    }
}
