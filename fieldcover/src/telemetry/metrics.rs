//! Lock-free session counters.
//!
//! All counters use `Relaxed` ordering; they are independent tallies and
//! readers only ever need an approximate point-in-time view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::MetricsSnapshot;

/// Counters for one tracking session.
#[derive(Debug)]
pub struct SessionMetrics {
    /// When the session started
    start_time: Instant,

    // === Fix metrics ===
    /// Fixes that passed validation
    fixes_processed: AtomicU64,
    /// Fixes rejected as invalid
    fixes_rejected: AtomicU64,
    /// Valid fixes below the minimum speed
    fixes_too_slow: AtomicU64,
    /// Valid fixes without heading
    fixes_without_heading: AtomicU64,

    // === Ribbon metrics ===
    /// Commit batches (one or more records appended)
    commits: AtomicU64,
    /// As-applied records appended
    records_appended: AtomicU64,

    // === Output metrics ===
    /// Telemetry records the sink rejected
    telemetry_failures: AtomicU64,
    /// Coverage stats recomputations
    stats_recomputes: AtomicU64,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMetrics {
    /// Creates a new metrics instance.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            fixes_processed: AtomicU64::new(0),
            fixes_rejected: AtomicU64::new(0),
            fixes_too_slow: AtomicU64::new(0),
            fixes_without_heading: AtomicU64::new(0),
            commits: AtomicU64::new(0),
            records_appended: AtomicU64::new(0),
            telemetry_failures: AtomicU64::new(0),
            stats_recomputes: AtomicU64::new(0),
        }
    }

    /// Record a valid fix.
    pub fn fix_processed(&self) {
        self.fixes_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected fix.
    pub fn fix_rejected(&self) {
        self.fixes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fix below the minimum speed.
    pub fn fix_too_slow(&self) {
        self.fixes_too_slow.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fix without heading.
    pub fn fix_without_heading(&self) {
        self.fixes_without_heading.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a commit batch of `records` appended records.
    pub fn committed(&self, records: usize) {
        self.commits.fetch_add(1, Ordering::Relaxed);
        self.records_appended
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    /// Record a telemetry delivery failure.
    pub fn telemetry_failed(&self) {
        self.telemetry_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stats recomputation.
    pub fn stats_recomputed(&self) {
        self.stats_recomputes.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            fixes_processed: self.fixes_processed.load(Ordering::Relaxed),
            fixes_rejected: self.fixes_rejected.load(Ordering::Relaxed),
            fixes_too_slow: self.fixes_too_slow.load(Ordering::Relaxed),
            fixes_without_heading: self.fixes_without_heading.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            records_appended: self.records_appended.load(Ordering::Relaxed),
            telemetry_failures: self.telemetry_failures.load(Ordering::Relaxed),
            stats_recomputes: self.stats_recomputes.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_counters() {
        let metrics = SessionMetrics::new();
        metrics.fix_processed();
        metrics.fix_processed();
        metrics.fix_rejected();
        metrics.fix_too_slow();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.fixes_processed, 2);
        assert_eq!(snapshot.fixes_rejected, 1);
        assert_eq!(snapshot.fixes_too_slow, 1);
        assert_eq!(snapshot.fixes_without_heading, 0);
    }

    #[test]
    fn test_commit_counts_batches_and_records() {
        let metrics = SessionMetrics::new();
        metrics.committed(2);
        metrics.committed(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.commits, 2);
        assert_eq!(snapshot.records_appended, 6);
    }
}
