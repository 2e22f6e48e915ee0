//! Ribbon construction and commit.
//!
//! Each side keeps two open polygons ("ribbons"): the inner band between
//! the vehicle and the inner point, and the outer band between the inner
//! and outer points. Every active fix adds one cross-section:
//!
//! ```text
//!   front of list                       back of list
//!   second_n … second_2 second_1 │ first_1 first_2 … first_n
//! ```
//!
//! One vertex goes to the back, its partner to the front, so the ring
//! stays a simple strip along the path.
//!
//! # State machine
//!
//! ```text
//!        rate > 0                 rate changed
//! Idle ───────────► Active ───────────────────► Commit ──► Idle / Active
//!                   (extend per fix)            (append 0.7 + 0.3 records)
//! ```

use std::collections::VecDeque;

use geo_types::{Coord, LineString, Point, Polygon};

use crate::model::{AsAppliedRecord, Side, INNER_COVERAGE_WEIGHT, OUTER_COVERAGE_WEIGHT};
use crate::swath::SideEdge;

/// Open vertices needed before a ribbon becomes a record (two cross-sections).
const MIN_RING_VERTICES: usize = 4;

/// Distance band a ribbon covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibbonBand {
    /// Vehicle to inner point.
    Inner,
    /// Inner point to outer point.
    Outer,
}

impl RibbonBand {
    /// Coverage weight recorded when this band is committed.
    pub fn weight(&self) -> f64 {
        match self {
            RibbonBand::Inner => INNER_COVERAGE_WEIGHT,
            RibbonBand::Outer => OUTER_COVERAGE_WEIGHT,
        }
    }

    /// The `(back, front)` vertex pair this band takes from an edge.
    fn vertices(&self, edge: &SideEdge) -> (Point<f64>, Point<f64>) {
        match self {
            RibbonBand::Inner => (edge.inner, edge.center),
            RibbonBand::Outer => (edge.outer, edge.inner),
        }
    }
}

impl std::fmt::Display for RibbonBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RibbonBand::Inner => write!(f, "inner"),
            RibbonBand::Outer => write!(f, "outer"),
        }
    }
}

/// An open polygon strip under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    band: RibbonBand,
    vertices: VecDeque<Coord<f64>>,
}

impl Ribbon {
    /// Create an empty ribbon.
    pub fn new(band: RibbonBand) -> Self {
        Self {
            band,
            vertices: VecDeque::new(),
        }
    }

    /// Band of this ribbon.
    pub fn band(&self) -> RibbonBand {
        self.band
    }

    /// True when no edge has been added since the last commit.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of vertices in the open ring.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices in ring order.
    pub fn vertices(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.vertices.iter()
    }

    /// Add one cross-section to the strip.
    pub fn extend(&mut self, edge: &SideEdge) {
        let (back, front) = self.band.vertices(edge);
        self.vertices.push_back(back.0);
        self.vertices.push_front(front.0);
    }

    /// Current ring as a polygon. The ring is closed automatically.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.vertices.iter().copied().collect::<Vec<_>>()), vec![])
    }

    /// Close the ribbon into an as-applied record and reset it.
    ///
    /// Returns `None` for an empty ribbon. When `closing` is given, that
    /// edge is added first so the record reaches the current position.
    /// A ribbon that still holds a single cross-section after that is
    /// discarded: two vertices do not form a ring.
    pub fn commit(
        &mut self,
        closing: Option<&SideEdge>,
        rate: f64,
        timestamp: f64,
    ) -> Option<AsAppliedRecord> {
        if self.is_empty() {
            return None;
        }
        if let Some(edge) = closing {
            self.extend(edge);
        }

        if self.vertices.len() < MIN_RING_VERTICES {
            tracing::debug!(
                band = %self.band,
                vertices = self.vertices.len(),
                "Discarding ribbon with a single cross-section"
            );
            self.vertices.clear();
            return None;
        }

        let polygon = self.to_polygon();
        self.vertices.clear();

        Some(AsAppliedRecord::new(
            polygon,
            self.band.weight(),
            rate,
            timestamp,
            None,
        ))
    }
}

/// Rate and open ribbons of one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideState {
    side: Side,
    committed_rate: f64,
    inner: Ribbon,
    outer: Ribbon,
}

impl SideState {
    /// An idle side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            committed_rate: 0.0,
            inner: Ribbon::new(RibbonBand::Inner),
            outer: Ribbon::new(RibbonBand::Outer),
        }
    }

    /// Which side this is.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Rate currently being applied.
    pub fn committed_rate(&self) -> f64 {
        self.committed_rate
    }

    /// Open inner ribbon.
    pub fn inner(&self) -> &Ribbon {
        &self.inner
    }

    /// Open outer ribbon.
    pub fn outer(&self) -> &Ribbon {
        &self.outer
    }

    /// Rate 0 with no open ribbon.
    pub fn is_idle(&self) -> bool {
        self.committed_rate == 0.0 && self.inner.is_empty() && self.outer.is_empty()
    }

    /// Commit both open ribbons at the current committed rate.
    ///
    /// Empty ribbons produce nothing; committing twice in a row yields no
    /// records the second time.
    pub fn commit(&mut self, closing: Option<&SideEdge>, timestamp: f64) -> Vec<AsAppliedRecord> {
        let rate = self.committed_rate;
        let records: Vec<_> = [&mut self.inner, &mut self.outer]
            .into_iter()
            .filter_map(|ribbon| ribbon.commit(closing, rate, timestamp))
            .collect();

        if !records.is_empty() {
            tracing::debug!(
                side = %self.side,
                rate,
                records = records.len(),
                closed = closing.is_some(),
                "Ribbons committed"
            );
        }
        records
    }

    /// Apply a new rate decision at a fix.
    ///
    /// On a rate change the open ribbons are committed with the previous
    /// rate, closed at `edge`. A positive rate then extends both ribbons.
    pub fn advance(&mut self, new_rate: f64, edge: &SideEdge, timestamp: f64) -> Vec<AsAppliedRecord> {
        let mut records = Vec::new();

        if new_rate != self.committed_rate {
            records = self.commit(Some(edge), timestamp);
            tracing::debug!(
                side = %self.side,
                from = self.committed_rate,
                to = new_rate,
                "Rate changed"
            );
            self.committed_rate = new_rate;
        }

        if new_rate > 0.0 {
            self.inner.extend(edge);
            self.outer.extend(edge);
        }

        records
    }

    /// Commit without a closing edge and drop to rate 0.
    pub fn force_idle(&mut self, timestamp: f64) -> Vec<AsAppliedRecord> {
        let records = self.commit(None, timestamp);
        self.committed_rate = 0.0;
        records
    }
}

/// Both sides' ribbon state.
#[derive(Debug, Clone, PartialEq)]
pub struct RibbonBuilder {
    left: SideState,
    right: SideState,
}

impl Default for RibbonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RibbonBuilder {
    /// Both sides idle.
    pub fn new() -> Self {
        Self {
            left: SideState::new(Side::Left),
            right: SideState::new(Side::Right),
        }
    }

    /// State of one side.
    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Mutable state of one side.
    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Force both sides idle, left first.
    pub fn force_idle(&mut self, timestamp: f64) -> Vec<AsAppliedRecord> {
        let mut records = self.left.force_idle(timestamp);
        records.extend(self.right.force_idle(timestamp));
        records
    }

    /// True when both sides are idle.
    pub fn is_idle(&self) -> bool {
        self.left.is_idle() && self.right.is_idle()
    }
}
