//! GeoJSON document types for project files.
//!
//! Only the subset project files use is modeled: feature collections of
//! Polygon and MultiPolygon features. Positions keep longitude and latitude;
//! altitude is dropped.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::geometry::Shape;
use crate::model::number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) enum CollectionType {
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) enum FeatureType {
    Feature,
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            features,
        }
    }
}

/// A GeoJSON Feature with polygonal geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Option<Map<String, Value>>) -> Self {
        Self {
            kind: FeatureType::Feature,
            properties,
            geometry,
        }
    }
}

/// Polygonal GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub(super) enum Geometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// A `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Position(pub Coord<f64>);

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [number::to_value(self.0.x), number::to_value(self.0.y)].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Position(Coord { x: *x, y: *y })),
            [_, _, ..] => Err(D::Error::custom("position coordinates must be finite")),
            _ => Err(D::Error::custom(format!(
                "position needs at least 2 numbers, got {}",
                values.len()
            ))),
        }
    }
}

impl Geometry {
    /// Convert into a shape, checking ring sizes.
    pub fn into_shape(self) -> Result<Shape, String> {
        match self {
            Geometry::Polygon(rings) => Ok(Shape::Polygon(polygon_from_rings(rings)?)),
            Geometry::MultiPolygon(polygons) => {
                let polygons = polygons
                    .into_iter()
                    .enumerate()
                    .map(|(i, rings)| {
                        polygon_from_rings(rings).map_err(|e| format!("member {}: {}", i, e))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Shape::MultiPolygon(MultiPolygon(polygons)))
            }
        }
    }

    /// Convert a shape back into GeoJSON geometry of the same type.
    pub fn from_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Polygon(polygon) => Geometry::Polygon(rings_of(polygon)),
            Shape::MultiPolygon(multi) => {
                Geometry::MultiPolygon(multi.0.iter().map(rings_of).collect())
            }
        }
    }
}

fn polygon_from_rings(rings: Vec<Vec<Position>>) -> Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().enumerate().map(|(i, ring)| {
        if ring.len() < 4 {
            Err(format!("ring {} has {} positions, need at least 4", i, ring.len()))
        } else {
            Ok(LineString(ring.into_iter().map(|p| p.0).collect()))
        }
    });

    let exterior = rings
        .next()
        .ok_or_else(|| "polygon has no rings".to_string())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn rings_of(polygon: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.0.iter().copied().map(Position).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_polygon_feature_round_trip() {
        let input = json!({
            "type": "Feature",
            "properties": {"V22RATE": 0.5},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[8, 47], [8.001, 47], [8.001, 47.001], [8, 47]]]
            }
        });

        let feature: Feature = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&feature).unwrap(), input);
    }

    #[test]
    fn test_altitude_is_dropped() {
        let position: Position = serde_json::from_value(json!([8.5, 47.25, 420.0])).unwrap();
        assert_eq!(position.0, Coord { x: 8.5, y: 47.25 });
        assert_eq!(serde_json::to_value(position).unwrap(), json!([8.5, 47.25]));
    }

    #[test]
    fn test_short_position_rejected() {
        assert!(serde_json::from_value::<Position>(json!([8.5])).is_err());
    }

    #[test]
    fn test_unsupported_geometry_rejected() {
        let point = json!({"type": "Point", "coordinates": [8.0, 47.0]});
        assert!(serde_json::from_value::<Geometry>(point).is_err());
    }

    #[test]
    fn test_short_ring_rejected() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [[[8, 47], [8.001, 47], [8, 47]]]
        }))
        .unwrap();
        let err = geometry.into_shape().unwrap_err();
        assert!(err.contains("ring 0"), "{}", err);
    }

    #[test]
    fn test_polygon_with_hole_keeps_interior() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "Polygon",
            "coordinates": [
                [[8, 47], [8.01, 47], [8.01, 47.01], [8, 47.01], [8, 47]],
                [[8.004, 47.004], [8.006, 47.004], [8.006, 47.006], [8.004, 47.004]]
            ]
        }))
        .unwrap();

        let shape = geometry.clone().into_shape().unwrap();
        match &shape {
            Shape::Polygon(polygon) => assert_eq!(polygon.interiors().len(), 1),
            other => panic!("expected polygon, got {:?}", other),
        }
        assert_eq!(Geometry::from_shape(&shape), geometry);
    }

    #[test]
    fn test_multi_polygon_error_names_member() {
        let geometry: Geometry = serde_json::from_value(json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[8, 47], [8.001, 47], [8.001, 47.001], [8, 47]]],
                [[[9, 47], [9, 47]]]
            ]
        }))
        .unwrap();
        assert!(geometry.into_shape().unwrap_err().starts_with("member 1"));
    }
}
