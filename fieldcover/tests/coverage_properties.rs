//! Property tests for coverage tracking.
//!
//! - Finished area never decreases while fixes are processed, on straight
//!   lanes and on winding paths with U-turns
//! - Slow fixes always switch both sides off and leave nothing open
//! - Project export reproduces the imported document
//!
//! Run with: `cargo test --test coverage_properties`

use chrono::{TimeZone, Utc};
use geo_types::{polygon, Point, Polygon};
use proptest::prelude::*;
use serde_json::{json, Value};

use fieldcover::geometry::destination;
use fieldcover::model::BoundaryZone;
use fieldcover::{CoverageSession, Fix, Project, SessionConfig, Settings, Side, TrackingStatus};

// ============================================================================
// Helper Functions
// ============================================================================

fn center() -> Point<f64> {
    Point::new(8.2, 47.32)
}

fn square(around: Point<f64>, half_side_m: f64) -> Polygon<f64> {
    let n = destination(around, half_side_m, 0.0).y();
    let s = destination(around, half_side_m, 180.0).y();
    let e = destination(around, half_side_m, 90.0).x();
    let w = destination(around, half_side_m, 270.0).x();
    polygon![(x: w, y: s), (x: e, y: s), (x: e, y: n), (x: w, y: n), (x: w, y: s)]
}

fn session() -> CoverageSession {
    let mut session = CoverageSession::new(SessionConfig::default());
    session.load_project(Project {
        boundaries: vec![BoundaryZone::new(square(center(), 50.0), None)],
        prescriptions: vec![],
        as_applied: vec![],
        settings: Some(Settings::new(0.5, 20_000.0, 1.0)),
    });
    session
}

/// Fixes along a northbound lane, `(step_m, speed)` per fix.
fn lane_fixes(lane_offset_m: f64, steps: &[(f64, f64)]) -> Vec<Fix> {
    let start = destination(
        destination(center(), 45.0, 180.0),
        lane_offset_m.abs(),
        if lane_offset_m < 0.0 { 270.0 } else { 90.0 },
    );
    let mut travelled = 0.0;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(step_m, speed))| {
            travelled += step_m;
            let at = destination(start, travelled, 0.0);
            Fix::new(
                at.y(),
                at.x(),
                speed,
                Utc.timestamp_opt(1_712_059_200 + i as i64, 0).unwrap(),
            )
            .with_heading(0.0)
        })
        .collect()
}

/// Fixes along a winding path from the field center, `(step_m, turn_deg, speed)`
/// per fix. The heading changes by `turn_deg` before each step.
fn turning_fixes(start_heading: f64, steps: &[(f64, f64, f64)]) -> Vec<Fix> {
    let mut at = center();
    let mut heading = start_heading;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(step_m, turn_deg, speed))| {
            heading = (heading + turn_deg).rem_euclid(360.0);
            at = destination(at, step_m, heading);
            Fix::new(
                at.y(),
                at.x(),
                speed,
                Utc.timestamp_opt(1_712_059_200 + i as i64, 0).unwrap(),
            )
            .with_heading(heading)
        })
        .collect()
}

/// Heading change per fix: mostly gentle or sharp turns, sometimes a U-turn.
fn turn_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -60.0f64..60.0,
        1 => prop::sample::select(vec![-180.0, 150.0, 180.0]),
    ]
}

/// A closed square ring as JSON positions, kept off integral values.
fn ring_json(x_step: u32, y_step: u32, size_step: u32) -> Value {
    let x0 = 8.1 + f64::from(x_step) / 10_000.0;
    let y0 = 47.3 + f64::from(y_step) / 10_000.0;
    let d = f64::from(size_step) / 100_000.0;
    json!([[[x0, y0], [x0 + d, y0], [x0 + d, y0 + d], [x0, y0 + d], [x0, y0]]])
}

fn feature(coordinates: Value, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": coordinates },
        "properties": properties,
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Finished area is monotonically non-decreasing over a session.
    #[test]
    fn prop_finished_area_never_decreases(
        lane in -20.0f64..20.0,
        steps in prop::collection::vec((1.0f64..8.0, 0.0f64..3.0), 1..14),
    ) {
        let mut session = session();
        let mut finished = session.stats().finished_area_m2;

        for fix in lane_fixes(lane, &steps) {
            let outcome = session.process_fix(&fix).unwrap();
            prop_assert!(
                outcome.stats.finished_area_m2 + 1e-6 >= finished,
                "finished dropped from {} to {}",
                finished,
                outcome.stats.finished_area_m2
            );
            finished = outcome.stats.finished_area_m2;
        }

        session.stop();
        prop_assert!(session.stats().finished_area_m2 + 1e-6 >= finished);
        prop_assert!(session.stats().finished_area_m2 <= session.stats().total_area_m2 + 1e-6);
    }

    /// Finished area stays monotone when the path turns back over itself.
    #[test]
    fn prop_finished_area_never_decreases_while_turning(
        start_heading in 0.0f64..360.0,
        steps in prop::collection::vec((1.0f64..8.0, turn_strategy(), 0.0f64..3.0), 1..16),
    ) {
        let mut session = session();
        let mut finished = session.stats().finished_area_m2;

        for fix in turning_fixes(start_heading, &steps) {
            let outcome = session.process_fix(&fix).unwrap();
            prop_assert!(
                outcome.stats.finished_area_m2 + 1e-6 >= finished,
                "finished dropped from {} to {}",
                finished,
                outcome.stats.finished_area_m2
            );
            finished = outcome.stats.finished_area_m2;
        }

        session.stop();
        prop_assert!(session.stats().finished_area_m2 + 1e-6 >= finished);
        prop_assert!(session.stats().finished_area_m2 <= session.stats().total_area_m2 + 1e-6);
    }

    /// A fix below the minimum speed yields zero rates and idle sides.
    #[test]
    fn prop_slow_fix_goes_idle(
        lane in -20.0f64..20.0,
        steps in prop::collection::vec((1.0f64..8.0, 0.5f64..3.0), 0..6),
        slow_speed in 0.0f64..0.5,
    ) {
        let mut session = session();
        for fix in lane_fixes(lane, &steps) {
            session.process_fix(&fix).unwrap();
        }
        let history_before = session.store().as_applied().len();

        let mut slow = lane_fixes(lane, &[(1.0, slow_speed)]).remove(0);
        slow.timestamp = Utc.timestamp_opt(1_712_060_000, 0).unwrap();
        let outcome = session.process_fix(&slow).unwrap();

        prop_assert_eq!(outcome.status, TrackingStatus::TooSlow);
        prop_assert_eq!((outcome.left_rate, outcome.right_rate), (0.0, 0.0));
        for side in Side::ALL {
            prop_assert!(session.side(side).is_idle());
        }

        // Every record from this commit carries the rate that was running.
        for record in &session.store().as_applied()[history_before..] {
            prop_assert_eq!(record.rate(), 1.0);
        }

        // A second slow fix has nothing left to commit.
        let again = session.process_fix(&slow).unwrap();
        prop_assert_eq!(again.committed_records, 0);
    }

    /// Import followed by export reproduces the document.
    #[test]
    fn prop_project_round_trip(
        boundaries in prop::collection::vec((1u32..999, 1u32..999, 1u32..99), 1..3),
        plan in prop::collection::vec(
            ((1u32..999, 1u32..999, 1u32..99), prop::sample::select(vec![0.25, 0.5, 0.75, 1.25])),
            0..4,
        ),
        protocol in prop::collection::vec(
            ((1u32..999, 1u32..999, 1u32..99), prop::bool::ANY, 0u32..100_000),
            0..5,
        ),
    ) {
        let document = json!({
            "boundaries": collection(
                boundaries
                    .iter()
                    .map(|&(x, y, d)| feature(ring_json(x, y, d), json!({ "name": "field" })))
                    .collect(),
            ),
            "plan": collection(
                plan.iter()
                    .map(|&((x, y, d), rate)| feature(ring_json(x, y, d), json!({ "V22RATE": rate })))
                    .collect(),
            ),
            "protocol": collection(
                protocol
                    .iter()
                    .map(|&((x, y, d), inner, t)| {
                        let coverage = if inner { 0.7 } else { 0.3 };
                        let timestamp = 1_712_059_200.5 + f64::from(t);
                        feature(
                            ring_json(x, y, d),
                            json!({ "coverage": coverage, "rate": 0.75, "timestamp": timestamp }),
                        )
                    })
                    .collect(),
            ),
            "settings": { "min_speed": 0.5, "throwing_range": 18000.5, "default_rate": 1.5 },
        });

        let project = Project::from_json(&document.to_string()).unwrap();
        prop_assert_eq!(project.to_value().unwrap(), document);
    }
}
