//! Point-in-time session metrics.

use std::fmt;
use std::time::Duration;

/// Immutable copy of [`SessionMetrics`](super::SessionMetrics).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// How long the session has been running
    pub uptime: Duration,
    /// Fixes that passed validation
    pub fixes_processed: u64,
    /// Fixes rejected as invalid
    pub fixes_rejected: u64,
    /// Valid fixes below the minimum speed
    pub fixes_too_slow: u64,
    /// Valid fixes without heading
    pub fixes_without_heading: u64,
    /// Commit batches
    pub commits: u64,
    /// As-applied records appended
    pub records_appended: u64,
    /// Telemetry delivery failures
    pub telemetry_failures: u64,
    /// Coverage stats recomputations
    pub stats_recomputes: u64,
}

impl MetricsSnapshot {
    /// Fixes seen in total, valid or not.
    pub fn fixes_total(&self) -> u64 {
        self.fixes_processed + self.fixes_rejected
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session ({:.1}s)", self.uptime.as_secs_f64())?;
        writeln!(
            f,
            "  Fixes: {} processed, {} rejected, {} too slow, {} without heading",
            self.fixes_processed, self.fixes_rejected, self.fixes_too_slow, self.fixes_without_heading
        )?;
        writeln!(
            f,
            "  Ribbons: {} commits, {} records",
            self.commits, self.records_appended
        )?;
        write!(
            f,
            "  Output: {} stats recomputes, {} telemetry failures",
            self.stats_recomputes, self.telemetry_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixes_total() {
        let snapshot = MetricsSnapshot {
            fixes_processed: 5,
            fixes_rejected: 2,
            ..Default::default()
        };
        assert_eq!(snapshot.fixes_total(), 7);
    }

    #[test]
    fn test_display_mentions_counts() {
        let snapshot = MetricsSnapshot {
            commits: 3,
            records_appended: 6,
            ..Default::default()
        };
        let text = snapshot.to_string();
        assert!(text.contains("3 commits, 6 records"));
    }
}
