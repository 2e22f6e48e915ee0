//! Rate decisions for each side of the vehicle.
//!
//! # Decision Logic
//!
//! ```text
//! in_bounds  = inner ∧ outer ∧ q1 ∧ q3 all inside Boundary
//! rate       = in_bounds ? default_rate : 0
//! rate       = in_bounds ∧ inner ∈ rated Prescription zone ? zone.rate : rate
//! rate       = Σ weight(AsApplied ∋ q1) > 0.3 ? 0 : rate
//! ```
//!
//! The bounds gate samples four points rather than intersecting the swath
//! polygon with the boundary. Each side is decided independently.

use geo_types::Point;

use crate::model::{PrescriptionZone, Settings, Side};
use crate::store::CoverageStore;
use crate::swath::{SidePoints, Swath};

/// Accumulated coverage weight above which a side is switched off.
pub const SUPPRESSION_THRESHOLD: f64 = 0.3;

/// Outcome of the decision for one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideDecision {
    /// Final rate for this fix.
    pub rate: f64,
    /// All gate points were inside the boundary.
    pub in_bounds: bool,
    /// Rate of the prescription zone that applied, if any.
    pub prescribed: Option<f64>,
    /// Summed coverage weight at the first-quartile point.
    pub coverage: f64,
    /// The rate was forced to zero by existing coverage.
    pub suppressed: bool,
}

impl SideDecision {
    /// A zero-rate decision with no further detail.
    pub fn idle() -> Self {
        Self {
            rate: 0.0,
            in_bounds: false,
            prescribed: None,
            coverage: 0.0,
            suppressed: false,
        }
    }
}

/// Decisions for both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateDecision {
    /// Left side.
    pub left: SideDecision,
    /// Right side.
    pub right: SideDecision,
}

impl RateDecision {
    /// Decision of one side.
    pub fn side(&self, side: Side) -> &SideDecision {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// `(left_rate, right_rate)`.
    pub fn rates(&self) -> (f64, f64) {
        (self.left.rate, self.right.rate)
    }
}

/// Stateless rate classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateDecider;

impl RateDecider {
    /// Decide both sides for one swath.
    pub fn decide(&self, store: &CoverageStore, settings: &Settings, swath: &Swath) -> RateDecision {
        RateDecision {
            left: self.decide_side(store, settings, &swath.left),
            right: self.decide_side(store, settings, &swath.right),
        }
    }

    /// Decide a single side.
    pub fn decide_side(
        &self,
        store: &CoverageStore,
        settings: &Settings,
        points: &SidePoints,
    ) -> SideDecision {
        let in_bounds = in_bounds(store, points);

        let mut rate = if in_bounds { settings.default_rate } else { 0.0 };

        let prescribed = if in_bounds {
            prescribed_rate(store.prescriptions(), &points.inner)
        } else {
            None
        };
        if let Some(zone_rate) = prescribed {
            rate = zone_rate;
        }

        let coverage = store.coverage_at(&points.first_quartile);
        let suppressed = coverage > SUPPRESSION_THRESHOLD;
        if suppressed {
            rate = 0.0;
        }

        SideDecision {
            rate,
            in_bounds,
            prescribed,
            coverage,
            suppressed,
        }
    }
}

/// Whether every gate point of a side lies inside the boundary.
pub fn in_bounds(store: &CoverageStore, points: &SidePoints) -> bool {
    points
        .bounds_points()
        .iter()
        .all(|point| store.boundary_contains(point))
}

/// Rate of the prescription zone governing a point.
///
/// Only zones carrying a rate are considered. When several contain the
/// point, the one with the smallest area wins; equal areas keep import
/// order.
pub fn prescribed_rate(zones: &[PrescriptionZone], point: &Point<f64>) -> Option<f64> {
    zones
        .iter()
        .filter(|zone| zone.rate().is_some())
        .filter(|zone| zone.footprint().contains_point(point))
        .min_by(|a, b| a.area_m2().total_cmp(&b.area_m2()))
        .and_then(|zone| zone.rate())
}
