//! Zone types: field boundary, prescription zones and as-applied records.
//!
//! The three layers of a project share a polygonal footprint but carry
//! different data. [`Zone`] is the tagged form used at the import/export
//! boundary; the store keeps each layer in its own typed collection.

use geo_types::{Point, Polygon};
use serde_json::{Map, Value};

use crate::geometry::{Footprint, Shape};

/// Coverage weight of the inner ribbon (close to the machine, fully covered).
pub const INNER_COVERAGE_WEIGHT: f64 = 0.7;

/// Coverage weight of the outer ribbon (partially covered fringe).
pub const OUTER_COVERAGE_WEIGHT: f64 = 0.3;

/// Free-form GeoJSON feature properties. `None` means `null` in the file.
pub type Attributes = Option<Map<String, Value>>;

/// One feature of the field outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryZone {
    footprint: Footprint,
    /// Properties carried through unchanged.
    pub attributes: Attributes,
}

impl BoundaryZone {
    /// Create a boundary zone.
    pub fn new(shape: impl Into<Shape>, attributes: Attributes) -> Self {
        Self {
            footprint: Footprint::new(shape),
            attributes,
        }
    }

    /// Outline geometry.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }
}

/// A sub-region of the field with an optional target rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionZone {
    footprint: Footprint,
    rate: Option<f64>,
    area_m2: f64,
    /// Properties carried through unchanged.
    pub attributes: Attributes,
}

impl PrescriptionZone {
    /// Create a prescription zone. The geodesic area is computed once here.
    pub fn new(shape: impl Into<Shape>, rate: Option<f64>, attributes: Attributes) -> Self {
        let footprint = Footprint::new(shape);
        let area_m2 = footprint.shape().area();
        Self {
            footprint,
            rate,
            area_m2,
            attributes,
        }
    }

    /// Zone geometry.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Target rate, if the zone carries one.
    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    /// Geodesic area in square meters.
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }
}

/// Immutable record of ground already treated.
#[derive(Debug, Clone, PartialEq)]
pub struct AsAppliedRecord {
    footprint: Footprint,
    weight: f64,
    rate: f64,
    timestamp: f64,
    /// Properties carried through unchanged.
    pub attributes: Attributes,
}

impl AsAppliedRecord {
    /// Create a record.
    ///
    /// `timestamp` is in fractional Unix seconds.
    pub fn new(
        shape: impl Into<Shape>,
        weight: f64,
        rate: f64,
        timestamp: f64,
        attributes: Attributes,
    ) -> Self {
        Self {
            footprint: Footprint::new(shape),
            weight,
            rate,
            timestamp,
            attributes,
        }
    }

    /// Record geometry.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Member polygons of the record.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        self.footprint.shape().polygons()
    }

    /// Coverage weight in (0, 1].
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Rate that was applied.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// When the record was committed (Unix seconds).
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Whether the record covers a point.
    pub fn covers(&self, point: &Point<f64>) -> bool {
        self.footprint.contains_point(point)
    }
}

/// Layer a zone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneLayer {
    /// Field outline.
    Boundary,
    /// Rate plan.
    Prescription,
    /// Application history.
    AsApplied,
}

impl std::fmt::Display for ZoneLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneLayer::Boundary => write!(f, "boundaries"),
            ZoneLayer::Prescription => write!(f, "plan"),
            ZoneLayer::AsApplied => write!(f, "protocol"),
        }
    }
}

/// Any zone, tagged by layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Zone {
    /// Part of the field outline.
    Boundary(BoundaryZone),
    /// Prescription zone.
    Prescription(PrescriptionZone),
    /// Committed as-applied record.
    AsApplied(AsAppliedRecord),
}

impl Zone {
    /// Layer of this zone.
    pub fn layer(&self) -> ZoneLayer {
        match self {
            Zone::Boundary(_) => ZoneLayer::Boundary,
            Zone::Prescription(_) => ZoneLayer::Prescription,
            Zone::AsApplied(_) => ZoneLayer::AsApplied,
        }
    }

    /// Zone geometry.
    pub fn footprint(&self) -> &Footprint {
        match self {
            Zone::Boundary(zone) => zone.footprint(),
            Zone::Prescription(zone) => zone.footprint(),
            Zone::AsApplied(record) => record.footprint(),
        }
    }

    /// Feature properties as written to a project file.
    ///
    /// Typed fields are only inserted when the original properties do not
    /// already hold them, so imported features export unchanged.
    pub fn properties(&self) -> Attributes {
        match self {
            Zone::Boundary(zone) => zone.attributes.clone(),
            Zone::Prescription(zone) => match zone.rate {
                Some(rate) => {
                    let mut props = zone.attributes.clone().unwrap_or_default();
                    props
                        .entry(PRESCRIPTION_RATE_KEY)
                        .or_insert_with(|| super::number::to_value(rate));
                    Some(props)
                }
                None => zone.attributes.clone(),
            },
            Zone::AsApplied(record) => {
                let mut props = record.attributes.clone().unwrap_or_default();
                props
                    .entry(COVERAGE_KEY)
                    .or_insert_with(|| super::number::to_value(record.weight));
                props
                    .entry(RATE_KEY)
                    .or_insert_with(|| super::number::to_value(record.rate));
                props
                    .entry(TIMESTAMP_KEY)
                    .or_insert_with(|| super::number::to_value(record.timestamp));
                Some(props)
            }
        }
    }
}

/// Property holding a prescription zone's target rate.
pub const PRESCRIPTION_RATE_KEY: &str = "V22RATE";
/// Property holding an as-applied record's coverage weight.
pub const COVERAGE_KEY: &str = "coverage";
/// Property holding an as-applied record's rate.
pub const RATE_KEY: &str = "rate";
/// Property holding an as-applied record's timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    fn unit_square() -> Polygon<f64> {
        polygon![
            (x: 8.0, y: 47.0),
            (x: 8.001, y: 47.0),
            (x: 8.001, y: 47.001),
            (x: 8.0, y: 47.001),
        ]
    }

    #[test]
    fn test_prescription_area_cached() {
        let zone = PrescriptionZone::new(unit_square(), Some(0.5), None);
        assert!(zone.area_m2() > 7_000.0 && zone.area_m2() < 9_000.0);
        assert_eq!(zone.rate(), Some(0.5));
    }

    #[test]
    fn test_record_covers_interior_point() {
        let record = AsAppliedRecord::new(unit_square(), 0.7, 1.0, 0.0, None);
        assert!(record.covers(&Point::new(8.0005, 47.0005)));
        assert!(!record.covers(&Point::new(8.5, 47.5)));
    }

    #[test]
    fn test_new_record_properties() {
        let zone = Zone::AsApplied(AsAppliedRecord::new(
            unit_square(),
            INNER_COVERAGE_WEIGHT,
            1.0,
            1712059200.5,
            None,
        ));
        let props = zone.properties().unwrap();
        assert_eq!(props[COVERAGE_KEY], 0.7);
        assert_eq!(props[RATE_KEY], 1);
        assert_eq!(props[TIMESTAMP_KEY], 1712059200.5);
    }

    #[test]
    fn test_imported_properties_preserved() {
        let mut attrs = Map::new();
        attrs.insert(PRESCRIPTION_RATE_KEY.to_string(), Value::from(0.75));
        attrs.insert("name".to_string(), Value::from("north strip"));

        let zone = Zone::Prescription(PrescriptionZone::new(
            unit_square(),
            Some(0.75),
            Some(attrs.clone()),
        ));
        assert_eq!(zone.properties(), Some(attrs));
        assert_eq!(zone.layer(), ZoneLayer::Prescription);
    }

    #[test]
    fn test_zone_without_rate_keeps_null_properties() {
        let zone = Zone::Prescription(PrescriptionZone::new(unit_square(), None, None));
        assert_eq!(zone.properties(), None);
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(ZoneLayer::Boundary.to_string(), "boundaries");
        assert_eq!(ZoneLayer::Prescription.to_string(), "plan");
        assert_eq!(ZoneLayer::AsApplied.to_string(), "protocol");
    }
}
