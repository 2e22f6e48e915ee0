//! Coverage store: the three polygon layers of a project.
//!
//! - **Boundary**: field outline, read-only for the session
//! - **Prescription**: rate zones, read-only for the session
//! - **AsApplied**: append-only history of committed ribbons
//!
//! The store is owned by a [`CoverageSession`](crate::session::CoverageSession);
//! nothing outside the tracking pipeline mutates it.

use geo_types::{MultiPolygon, Point};

use crate::geometry::{self, GeometryError};
use crate::model::{AsAppliedRecord, BoundaryZone, PrescriptionZone};

/// Polygon layers of one project.
#[derive(Debug, Clone)]
pub struct CoverageStore {
    boundaries: Vec<BoundaryZone>,
    boundary: MultiPolygon<f64>,
    total_area_m2: f64,
    prescriptions: Vec<PrescriptionZone>,
    as_applied: Vec<AsAppliedRecord>,
}

impl Default for CoverageStore {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

impl CoverageStore {
    /// Build a store from imported layers.
    ///
    /// The boundary outline is merged and its area computed once here.
    pub fn new(
        boundaries: Vec<BoundaryZone>,
        prescriptions: Vec<PrescriptionZone>,
        as_applied: Vec<AsAppliedRecord>,
    ) -> Self {
        let boundary = merge_boundaries(&boundaries);
        let total_area_m2 = geometry::area(&boundary);

        tracing::debug!(
            boundary_parts = boundaries.len(),
            prescriptions = prescriptions.len(),
            as_applied = as_applied.len(),
            total_area_m2 = format!("{:.1}", total_area_m2),
            "Coverage store created"
        );

        Self {
            boundaries,
            boundary,
            total_area_m2,
            prescriptions,
            as_applied,
        }
    }

    /// Boundary features as imported.
    pub fn boundaries(&self) -> &[BoundaryZone] {
        &self.boundaries
    }

    /// Merged boundary outline.
    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// Cached boundary area in square meters.
    pub fn total_area_m2(&self) -> f64 {
        self.total_area_m2
    }

    /// Prescription zones in import order.
    pub fn prescriptions(&self) -> &[PrescriptionZone] {
        &self.prescriptions
    }

    /// As-applied history in commit order.
    pub fn as_applied(&self) -> &[AsAppliedRecord] {
        &self.as_applied
    }

    /// Append a committed record.
    pub fn append(&mut self, record: AsAppliedRecord) {
        self.as_applied.push(record);
    }

    /// Whether any boundary feature contains the point.
    pub fn boundary_contains(&self, point: &Point<f64>) -> bool {
        self.boundaries
            .iter()
            .any(|zone| zone.footprint().contains_point(point))
    }

    /// Sum of coverage weights of every record covering the point.
    pub fn coverage_at(&self, point: &Point<f64>) -> f64 {
        self.as_applied
            .iter()
            .filter(|record| record.covers(point))
            .map(|record| record.weight())
            .sum()
    }

    /// Union of all as-applied polygons.
    pub fn applied_union(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        geometry::union_all(self.as_applied.iter().flat_map(|record| record.polygons()))
    }
}

/// Merge boundary features into one outline.
///
/// Overlapping features are unioned so shared ground counts once. If the
/// union fails the parts are kept side by side.
fn merge_boundaries(boundaries: &[BoundaryZone]) -> MultiPolygon<f64> {
    let polygons = || {
        boundaries
            .iter()
            .flat_map(|zone| zone.footprint().shape().polygons())
    };

    match geometry::union_all(polygons()) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(error = %e, "Boundary union failed, using raw parts");
            MultiPolygon(polygons().cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
    }

    #[test]
    fn test_empty_store() {
        let store = CoverageStore::default();
        assert_eq!(store.total_area_m2(), 0.0);
        assert!(store.as_applied().is_empty());
        assert!(!store.boundary_contains(&Point::new(8.0, 47.0)));
        assert_eq!(store.coverage_at(&Point::new(8.0, 47.0)), 0.0);
    }

    #[test]
    fn test_total_area_counts_overlap_once() {
        let a = BoundaryZone::new(square(8.0, 47.0, 0.001), None);
        let b = BoundaryZone::new(square(8.0, 47.0, 0.001), None);
        let single = CoverageStore::new(vec![a.clone()], vec![], vec![]);
        let doubled = CoverageStore::new(vec![a, b], vec![], vec![]);

        assert!((single.total_area_m2() - doubled.total_area_m2()).abs() < 1.0);
    }

    #[test]
    fn test_coverage_sums_weights() {
        let inner = AsAppliedRecord::new(square(8.0, 47.0, 0.001), 0.7, 1.0, 0.0, None);
        let outer = AsAppliedRecord::new(square(8.0, 47.0, 0.002), 0.3, 1.0, 0.0, None);
        let store = CoverageStore::new(vec![], vec![], vec![inner, outer]);

        let both = Point::new(8.0005, 47.0005);
        let outer_only = Point::new(8.0015, 47.0015);
        assert!((store.coverage_at(&both) - 1.0).abs() < 1e-12);
        assert!((store.coverage_at(&outer_only) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_append_is_ordered() {
        let mut store = CoverageStore::default();
        store.append(AsAppliedRecord::new(square(8.0, 47.0, 0.001), 0.7, 1.0, 1.0, None));
        store.append(AsAppliedRecord::new(square(8.0, 47.0, 0.001), 0.3, 1.0, 2.0, None));

        assert_eq!(store.as_applied().len(), 2);
        assert_eq!(store.as_applied()[0].timestamp(), 1.0);
        assert_eq!(store.as_applied()[1].timestamp(), 2.0);
    }

    #[test]
    fn test_applied_union_of_empty_history() {
        let store = CoverageStore::default();
        assert!(store.applied_union().unwrap().0.is_empty());
    }
}
