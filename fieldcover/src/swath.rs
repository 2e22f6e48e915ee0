//! Swath geometry: sample points projected across both sides of the vehicle.
//!
//! # Layout
//!
//! ```text
//!                     front (5 m ahead)
//!                          ▲
//!  outer  q3  inner  q1  center  q1  inner  q3  outer
//!   1.0  0.75  0.5  0.25   ●    0.25  0.5  0.75  1.0   × throwing range
//!  ◄──────── left ────────     ──────── right ───────►
//! ```
//!
//! The quartile, inner and outer points decide whether a side is in bounds;
//! the inner point selects the prescription rate; the first-quartile point
//! samples existing coverage; center/inner/outer form the ribbon edges.

use geo_types::Point;

use crate::geometry::destination;
use crate::model::{Settings, Side};

/// Distance of the informational front point ahead of the vehicle (meters).
pub const FRONT_POINT_DISTANCE_M: f64 = 5.0;

/// Fractions of the throwing range at which side points are placed.
pub const FIRST_QUARTILE_FRACTION: f64 = 0.25;
/// Inner ribbon boundary.
pub const INNER_FRACTION: f64 = 0.5;
/// Third quartile.
pub const THIRD_QUARTILE_FRACTION: f64 = 0.75;
/// Outer ribbon boundary.
pub const OUTER_FRACTION: f64 = 1.0;

/// Projected points for one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidePoints {
    /// 0.25 × throwing range.
    pub first_quartile: Point<f64>,
    /// 0.5 × throwing range.
    pub inner: Point<f64>,
    /// 0.75 × throwing range.
    pub third_quartile: Point<f64>,
    /// 1.0 × throwing range.
    pub outer: Point<f64>,
}

impl SidePoints {
    /// The four points that must all be inside the boundary.
    pub fn bounds_points(&self) -> [Point<f64>; 4] {
        [
            self.inner,
            self.outer,
            self.first_quartile,
            self.third_quartile,
        ]
    }
}

/// One cross-section of a ribbon: vehicle center plus a side's band edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideEdge {
    /// Vehicle position.
    pub center: Point<f64>,
    /// Inner band edge.
    pub inner: Point<f64>,
    /// Outer band edge.
    pub outer: Point<f64>,
}

/// All swath points for one fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swath {
    /// Vehicle position.
    pub center: Point<f64>,
    /// Point ahead of the vehicle, for display only.
    pub front: Point<f64>,
    /// Left side points.
    pub left: SidePoints,
    /// Right side points.
    pub right: SidePoints,
}

impl Swath {
    /// Points of one side.
    pub fn side(&self, side: Side) -> &SidePoints {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Ribbon cross-section for one side.
    pub fn edge(&self, side: Side) -> SideEdge {
        let points = self.side(side);
        SideEdge {
            center: self.center,
            inner: points.inner,
            outer: points.outer,
        }
    }
}

/// Computes swath points from a position, heading and settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwathGeometer;

impl SwathGeometer {
    /// Project all swath points for a fix with known heading.
    ///
    /// # Arguments
    ///
    /// * `center` - Vehicle position (lon/lat)
    /// * `heading_deg` - Direction of travel in degrees
    /// * `settings` - Supplies the throwing range
    pub fn compute(&self, center: Point<f64>, heading_deg: f64, settings: &Settings) -> Swath {
        let range_m = settings.throwing_range_m();

        Swath {
            center,
            front: destination(center, FRONT_POINT_DISTANCE_M, heading_deg),
            left: side_points(center, Side::Left.bearing(heading_deg), range_m),
            right: side_points(center, Side::Right.bearing(heading_deg), range_m),
        }
    }
}

fn side_points(center: Point<f64>, bearing_deg: f64, range_m: f64) -> SidePoints {
    let at = |fraction: f64| destination(center, range_m * fraction, bearing_deg);

    SidePoints {
        first_quartile: at(FIRST_QUARTILE_FRACTION),
        inner: at(INNER_FRACTION),
        third_quartile: at(THIRD_QUARTILE_FRACTION),
        outer: at(OUTER_FRACTION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HaversineDistance;

    fn settings() -> Settings {
        Settings::new(0.5, 20_000.0, 1.0)
    }

    fn center() -> Point<f64> {
        Point::new(8.2, 47.32)
    }

    #[test]
    fn test_side_point_distances() {
        let swath = SwathGeometer.compute(center(), 0.0, &settings());

        for side in Side::ALL {
            let points = swath.side(side);
            let d = |p: &Point<f64>| center().haversine_distance(p);
            assert!((d(&points.first_quartile) - 5.0).abs() < 0.01);
            assert!((d(&points.inner) - 10.0).abs() < 0.01);
            assert!((d(&points.third_quartile) - 15.0).abs() < 0.01);
            assert!((d(&points.outer) - 20.0).abs() < 0.01);
        }
        assert!((center().haversine_distance(&swath.front) - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_heading_north_puts_left_west_and_right_east() {
        let swath = SwathGeometer.compute(center(), 0.0, &settings());
        assert!(swath.left.outer.x() < center().x());
        assert!(swath.right.outer.x() > center().x());
        assert!(swath.front.y() > center().y());
    }

    #[test]
    fn test_heading_east_puts_left_north() {
        let swath = SwathGeometer.compute(center(), 90.0, &settings());
        assert!(swath.left.outer.y() > center().y());
        assert!(swath.right.outer.y() < center().y());
    }

    #[test]
    fn test_edge_uses_side_points() {
        let swath = SwathGeometer.compute(center(), 45.0, &settings());
        let edge = swath.edge(Side::Right);
        assert_eq!(edge.center, center());
        assert_eq!(edge.inner, swath.right.inner);
        assert_eq!(edge.outer, swath.right.outer);
    }

    #[test]
    fn test_zero_range_collapses_to_center() {
        let swath = SwathGeometer.compute(center(), 10.0, &Settings::new(0.5, 0.0, 1.0));
        for p in swath.left.bounds_points() {
            assert!(center().haversine_distance(&p) < 1e-6);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_sides_are_symmetric_at_fixed_fractions(
                heading in 0.0..360.0_f64,
                range_mm in 1_000.0..40_000.0_f64,
            ) {
                let settings = Settings::new(0.5, range_mm, 1.0);
                let swath = SwathGeometer.compute(center(), heading, &settings);
                let range_m = range_mm / 1000.0;

                for side in Side::ALL {
                    let points = swath.side(side);
                    let d = |p: &Point<f64>| center().haversine_distance(p);
                    prop_assert!((d(&points.first_quartile) - 0.25 * range_m).abs() < 1e-3 * range_m);
                    prop_assert!((d(&points.inner) - 0.5 * range_m).abs() < 1e-3 * range_m);
                    prop_assert!((d(&points.third_quartile) - 0.75 * range_m).abs() < 1e-3 * range_m);
                    prop_assert!((d(&points.outer) - range_m).abs() < 1e-3 * range_m);
                }

                // Left and right outer points sit a full swath apart.
                let width = swath.left.outer.haversine_distance(&swath.right.outer);
                prop_assert!((width - 2.0 * range_m).abs() < 1e-2 * range_m);
            }
        }
    }
}
