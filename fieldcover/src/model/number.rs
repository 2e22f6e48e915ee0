//! JSON number formatting shared by settings, zone properties and positions.
//!
//! Project files are produced by JavaScript tooling, which writes integral
//! numbers without a fractional part. Writing `24000` instead of `24000.0`
//! keeps exported files byte-compatible with what was imported.

use serde::Serializer;

/// Largest integer a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Serialize an `f64`, writing integral values as integers.
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Convert an `f64` into a JSON value using the same rule.
pub fn to_value(value: f64) -> serde_json::Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(value as i64)
    } else {
        serde_json::Value::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_values_become_integers() {
        assert_eq!(to_value(3.0).to_string(), "3");
        assert_eq!(to_value(-12.0).to_string(), "-12");
    }

    #[test]
    fn test_fractional_values_stay_floats() {
        assert_eq!(to_value(0.7).to_string(), "0.7");
        assert_eq!(to_value(1712059200.5).to_string(), "1712059200.5");
    }

    #[test]
    fn test_serializer_matches_to_value() {
        #[derive(serde::Serialize)]
        struct Wrapper(#[serde(serialize_with = "serialize")] f64);

        assert_eq!(serde_json::to_string(&Wrapper(24000.0)).unwrap(), "24000");
        assert_eq!(serde_json::to_string(&Wrapper(0.25)).unwrap(), "0.25");
    }
}
