//! Coverage statistics.
//!
//! ```text
//! total    = area(Boundary)                       cached at import
//! missing  = area(Boundary − ⋃ AsApplied)         total when history is empty
//! finished = total − missing
//! ```
//!
//! The union/difference step grows with the history, so [`StatsTracker`]
//! recomputes once per N commit batches and reports recomputes that run
//! over their time budget.

use std::fmt;
use std::time::{Duration, Instant};

use crate::geometry::{self, GeometryError};
use crate::store::CoverageStore;

/// Square meters per hectare.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Numerical noise allowed between two recomputes of the same history.
const FINISHED_TOLERANCE_M2: f64 = 1e-6;

/// Convert square meters to hectares.
#[inline]
pub fn to_hectares(square_meters: f64) -> f64 {
    square_meters / SQUARE_METERS_PER_HECTARE
}

/// Field coverage in square meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverageStats {
    /// Boundary area.
    pub total_area_m2: f64,
    /// Boundary area already treated.
    pub finished_area_m2: f64,
    /// Boundary area not yet treated.
    pub missing_area_m2: f64,
}

impl CoverageStats {
    /// Stats for a field nothing has been applied to.
    pub fn untreated(total_area_m2: f64) -> Self {
        Self {
            total_area_m2,
            finished_area_m2: 0.0,
            missing_area_m2: total_area_m2,
        }
    }

    /// Compute stats from the store.
    ///
    /// An empty history is untreated. Geometry failures are returned.
    pub fn try_compute(store: &CoverageStore) -> Result<Self, GeometryError> {
        let total = store.total_area_m2();
        if store.as_applied().is_empty() {
            return Ok(Self::untreated(total));
        }

        let applied = store.applied_union()?;
        let remaining = geometry::difference(store.boundary(), &applied)?;
        let missing = geometry::area(&remaining).min(total);

        Ok(Self {
            total_area_m2: total,
            finished_area_m2: (total - missing).max(0.0),
            missing_area_m2: missing,
        })
    }

    /// Compute stats from the store, reporting no coverage when the
    /// geometry cannot be evaluated.
    pub fn compute(store: &CoverageStore) -> Self {
        Self::try_compute(store).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Coverage difference failed, reporting no coverage");
            Self::untreated(store.total_area_m2())
        })
    }

    /// Treated share of the field in [0, 1]. Zero for an empty boundary.
    pub fn finished_fraction(&self) -> f64 {
        if self.total_area_m2 > 0.0 {
            (self.finished_area_m2 / self.total_area_m2).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl fmt::Display for CoverageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} ha total, {:.2} ha finished, {:.2} ha missing",
            to_hectares(self.total_area_m2),
            to_hectares(self.finished_area_m2),
            to_hectares(self.missing_area_m2)
        )
    }
}

/// Throttled stats recomputation.
#[derive(Debug, Clone)]
pub struct StatsTracker {
    interval: u32,
    budget: Duration,
    pending: u32,
    current: CoverageStats,
    recomputes: u64,
}

impl StatsTracker {
    /// Create a tracker.
    ///
    /// # Arguments
    ///
    /// * `interval` - Commit batches between recomputes (0 is treated as 1)
    /// * `budget` - Recompute duration above which a warning is logged
    pub fn new(interval: u32, budget: Duration) -> Self {
        Self {
            interval: interval.max(1),
            budget,
            pending: 0,
            current: CoverageStats::default(),
            recomputes: 0,
        }
    }

    /// Latest computed stats.
    pub fn current(&self) -> CoverageStats {
        self.current
    }

    /// Number of recomputes so far.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Commit batches seen since the last recompute.
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Record a commit batch; recompute when the interval is reached.
    ///
    /// Returns `true` when the stats were recomputed.
    pub fn on_commit(&mut self, store: &CoverageStore) -> bool {
        self.pending += 1;
        if self.pending >= self.interval {
            self.refresh(store);
            true
        } else {
            false
        }
    }

    /// Recompute from a freshly loaded store, dropping the previous stats.
    pub fn reset(&mut self, store: &CoverageStore) -> CoverageStats {
        self.current = CoverageStats::untreated(store.total_area_m2());
        self.refresh(store)
    }

    /// Recompute immediately, ignoring the interval.
    ///
    /// The history only grows, so a failed recompute or one reporting less
    /// finished area than before keeps the previous stats.
    pub fn refresh(&mut self, store: &CoverageStore) -> CoverageStats {
        let started = Instant::now();
        let computed = CoverageStats::try_compute(store);
        let elapsed = started.elapsed();

        self.pending = 0;
        self.recomputes += 1;

        match computed {
            Ok(stats) if stats.total_area_m2 != self.current.total_area_m2 => {
                self.current = stats;
            }
            Ok(stats)
                if stats.finished_area_m2 + FINISHED_TOLERANCE_M2
                    < self.current.finished_area_m2 =>
            {
                tracing::warn!(
                    previous_m2 = self.current.finished_area_m2,
                    computed_m2 = stats.finished_area_m2,
                    "Finished area shrank, keeping previous stats"
                );
            }
            Ok(stats) => {
                self.current = stats;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Coverage stats recompute failed, keeping previous stats");
                if self.current.total_area_m2 != store.total_area_m2() {
                    self.current = CoverageStats::untreated(store.total_area_m2());
                }
            }
        }

        if elapsed > self.budget {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.budget.as_millis() as u64,
                records = store.as_applied().len(),
                "Coverage stats recompute over budget, consider a larger stats_interval"
            );
        } else {
            tracing::debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                finished_ha = format!("{:.3}", to_hectares(self.current.finished_area_m2)),
                "Coverage stats recomputed"
            );
        }

        self.current
    }
}
