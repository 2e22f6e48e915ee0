//! Geometry adapter module
//!
//! Wraps the `geo` crate behind the handful of operations the tracker needs:
//! great-circle destination points, point-in-polygon tests, geodesic area,
//! and polygon union/difference.
//!
//! All operations are pure and tolerate degenerate input. An empty or
//! zero-area polygon has area 0 and contains no point; boolean operations
//! skip degenerate polygons instead of handing them to the sweep-line
//! implementation.
//!
//! # Coordinates
//!
//! Points use `x = longitude`, `y = latitude` in degrees, matching GeoJSON
//! position order. Distances are meters and bearings are degrees clockwise
//! from north.

mod shape;

pub use shape::{Footprint, Shape};

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{Area, BooleanOps, Contains, GeodesicArea, HaversineDestination};
use geo_types::{MultiPolygon, Point, Polygon};
use thiserror::Error;

/// Planar area (degrees²) below which a polygon is treated as degenerate.
///
/// Roughly 1e-8 m² at mid latitudes.
pub const MIN_PLANAR_AREA: f64 = 1e-18;

/// Errors raised by geometry operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// The boolean-op implementation rejected the input.
    #[error("Polygon {operation} failed on degenerate input")]
    BooleanOp {
        /// Name of the failed operation (union, difference).
        operation: &'static str,
    },
}

/// Projects a point along a great circle.
///
/// # Arguments
///
/// * `origin` - Start point (lon/lat degrees)
/// * `distance_m` - Distance to travel in meters
/// * `bearing_deg` - Initial bearing in degrees clockwise from north
#[inline]
pub fn destination(origin: Point<f64>, distance_m: f64, bearing_deg: f64) -> Point<f64> {
    origin.haversine_destination(bearing_deg, distance_m)
}

/// Tests whether a point lies strictly inside a polygon.
///
/// Points on the boundary and polygons without area report `false`.
#[inline]
pub fn point_in_polygon(point: &Point<f64>, polygon: &Polygon<f64>) -> bool {
    !is_degenerate(polygon) && polygon.contains(point)
}

/// Tests whether a point lies strictly inside any member of a multi-polygon.
pub fn point_in_multi_polygon(point: &Point<f64>, shape: &MultiPolygon<f64>) -> bool {
    shape.0.iter().any(|polygon| point_in_polygon(point, polygon))
}

/// Geodesic area of a multi-polygon in square meters.
///
/// Empty input yields 0.
pub fn area(shape: &MultiPolygon<f64>) -> f64 {
    shape
        .0
        .iter()
        .filter(|polygon| !is_degenerate(polygon))
        .map(|polygon| polygon.geodesic_area_unsigned())
        .sum()
}

/// Computes `a - b`.
///
/// Returns an empty multi-polygon when nothing of `a` remains.
pub fn difference(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let a = without_degenerate(a.0.iter());
    let b = without_degenerate(b.0.iter());

    if a.0.is_empty() {
        return Ok(MultiPolygon(Vec::new()));
    }
    if b.0.is_empty() {
        return Ok(a);
    }

    guarded("difference", || a.difference(&b))
}

/// Combines a set of polygons into a single multi-polygon.
///
/// Degenerate members are dropped. Overlapping members are merged so that
/// the area of the result counts shared ground once. A member the sweep
/// cannot merge (typically a self-intersecting strip from a tight turn) is
/// skipped and the union of the others is kept.
pub fn union_all<'a, I>(polygons: I) -> Result<MultiPolygon<f64>, GeometryError>
where
    I: IntoIterator<Item = &'a Polygon<f64>>,
{
    let mut merged = MultiPolygon(Vec::new());
    let mut skipped = 0usize;

    for (index, polygon) in polygons.into_iter().enumerate() {
        if is_degenerate(polygon) {
            continue;
        }
        let next = MultiPolygon(vec![polygon.clone()]);
        if merged.0.is_empty() {
            merged = next;
            continue;
        }
        match guarded("union", || merged.union(&next)) {
            Ok(result) => merged = result,
            Err(_) => {
                skipped += 1;
                tracing::warn!(member = index, "Skipping polygon that could not be merged");
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Union completed without some members");
    }
    Ok(merged)
}

/// Whether a polygon is too small or too short to take part in area math.
pub fn is_degenerate(polygon: &Polygon<f64>) -> bool {
    // A closed triangle needs four positions.
    polygon.exterior().0.len() < 4 || polygon.unsigned_area() < MIN_PLANAR_AREA
}

fn without_degenerate<'a, I>(polygons: I) -> MultiPolygon<f64>
where
    I: Iterator<Item = &'a Polygon<f64>>,
{
    MultiPolygon(
        polygons
            .filter(|polygon| !is_degenerate(polygon))
            .cloned()
            .collect(),
    )
}

/// Runs a boolean op, converting an internal panic into an error.
fn guarded<F>(operation: &'static str, op: F) -> Result<MultiPolygon<f64>, GeometryError>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    catch_unwind(AssertUnwindSafe(op)).map_err(|_| {
        tracing::warn!(operation, "Polygon boolean operation panicked");
        GeometryError::BooleanOp { operation }
    })
}
