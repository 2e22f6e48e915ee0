//! Tracking session: one fix in, rates and coverage out.
//!
//! # Pipeline
//!
//! ```text
//! Fix ─► validate ─► SwathGeometer ─► RateDecider ─► RibbonBuilder ─► CoverageStore
//!                                                         │                 │
//!                                     TelemetrySink ◄─────┘    StatsTracker ◄┘
//! ```
//!
//! A [`CoverageSession`] owns every piece of mutable tracking state. Fixes
//! are processed one at a time, synchronously; nothing else mutates the
//! store or the ribbons.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigFile, DEFAULT_STATS_BUDGET_MS, DEFAULT_STATS_INTERVAL};
use crate::model::{AsAppliedRecord, Fix, FixError, Settings, SettingsError, Side};
use crate::project::Project;
use crate::rate::{RateDecider, RateDecision};
use crate::ribbon::{RibbonBuilder, SideState};
use crate::stats::{CoverageStats, StatsTracker};
use crate::store::CoverageStore;
use crate::swath::{Swath, SwathGeometer};
use crate::telemetry::{NullSink, SessionMetrics, TelemetryRecord, TelemetrySink};

/// Runtime options for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Recompute coverage stats every N commit batches.
    pub stats_interval: u32,
    /// Recompute duration above which a warning is logged.
    pub stats_budget: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stats_interval: DEFAULT_STATS_INTERVAL,
            stats_budget: Duration::from_millis(DEFAULT_STATS_BUDGET_MS),
        }
    }
}

impl SessionConfig {
    /// Set the stats interval.
    pub fn with_stats_interval(mut self, interval: u32) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Set the stats time budget.
    pub fn with_stats_budget(mut self, budget: Duration) -> Self {
        self.stats_budget = budget;
        self
    }
}

impl From<&ConfigFile> for SessionConfig {
    fn from(config: &ConfigFile) -> Self {
        Self {
            stats_interval: config.session.stats_interval,
            stats_budget: Duration::from_millis(config.session.stats_budget_ms),
        }
    }
}

/// Tracking state surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Rates are being decided from position and heading.
    Applying,
    /// Speed is below the minimum; both sides off.
    TooSlow,
    /// No position or heading available; both sides off.
    HeadingUnavailable,
    /// No settings loaded; both sides off.
    NoProject,
}

impl TrackingStatus {
    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            TrackingStatus::Applying => "Applying",
            TrackingStatus::TooSlow => "Too slow",
            TrackingStatus::HeadingUnavailable => "Position or heading unavailable",
            TrackingStatus::NoProject => "No project loaded",
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of processing one fix.
#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    /// Rate on the left side.
    pub left_rate: f64,
    /// Rate on the right side.
    pub right_rate: f64,
    /// Tracking status after this fix.
    pub status: TrackingStatus,
    /// As-applied records appended by this fix.
    pub committed_records: usize,
    /// Latest coverage stats.
    pub stats: CoverageStats,
    /// Swath points, when a rate decision was made.
    pub swath: Option<Swath>,
    /// Per-side decision detail, when a rate decision was made.
    pub decision: Option<RateDecision>,
}

/// Owner of all tracking state for one field.
pub struct CoverageSession<S = NullSink> {
    config: SessionConfig,
    store: CoverageStore,
    settings: Option<Settings>,
    ribbons: RibbonBuilder,
    stats: StatsTracker,
    status: TrackingStatus,
    last_timestamp: Option<f64>,
    sink: S,
    metrics: Arc<SessionMetrics>,
}

impl CoverageSession<NullSink> {
    /// Create a session without a project and without telemetry output.
    pub fn new(config: SessionConfig) -> Self {
        let stats = StatsTracker::new(config.stats_interval, config.stats_budget);
        Self {
            config,
            store: CoverageStore::default(),
            settings: None,
            ribbons: RibbonBuilder::new(),
            stats,
            status: TrackingStatus::NoProject,
            last_timestamp: None,
            sink: NullSink,
            metrics: Arc::new(SessionMetrics::new()),
        }
    }
}

impl<S: TelemetrySink> CoverageSession<S> {
    /// Replace the telemetry sink.
    pub fn with_sink<T: TelemetrySink>(self, sink: T) -> CoverageSession<T> {
        CoverageSession {
            config: self.config,
            store: self.store,
            settings: self.settings,
            ribbons: self.ribbons,
            stats: self.stats,
            status: self.status,
            last_timestamp: self.last_timestamp,
            sink,
            metrics: self.metrics,
        }
    }

    /// Replace the session's field data.
    ///
    /// Open ribbons of the previous project are discarded and stats are
    /// recomputed for the new one. A non-empty history continues where it
    /// left off.
    pub fn load_project(&mut self, project: Project) {
        tracing::info!(
            boundaries = project.boundaries.len(),
            prescriptions = project.prescriptions.len(),
            as_applied = project.as_applied.len(),
            has_settings = project.settings.is_some(),
            "Loading project into session"
        );

        self.store = CoverageStore::new(project.boundaries, project.prescriptions, project.as_applied);
        self.settings = project.settings;
        self.ribbons = RibbonBuilder::new();
        self.last_timestamp = None;
        self.status = if self.settings.is_some() {
            TrackingStatus::HeadingUnavailable
        } else {
            TrackingStatus::NoProject
        };

        self.stats.reset(&self.store);
        self.metrics.stats_recomputed();
    }

    /// Process one fix.
    ///
    /// An invalid fix is rejected with the session left exactly as it was
    /// and no telemetry emitted. Every valid fix produces a telemetry record.
    pub fn process_fix(&mut self, fix: &Fix) -> Result<FixOutcome, FixError> {
        let fix = match fix.validated() {
            Ok(fix) => fix,
            Err(e) => {
                self.metrics.fix_rejected();
                tracing::warn!(error = %e, "Fix rejected");
                return Err(e);
            }
        };
        self.metrics.fix_processed();

        let timestamp = fix.unix_seconds();
        self.last_timestamp = Some(timestamp);

        let mut swath = None;
        let mut decision = None;

        let (status, records) = match (&self.settings, fix.heading_deg) {
            (None, _) => (TrackingStatus::NoProject, Vec::new()),
            (Some(_), None) => {
                self.metrics.fix_without_heading();
                (TrackingStatus::HeadingUnavailable, self.ribbons.force_idle(timestamp))
            }
            (Some(settings), Some(_)) if fix.speed_mps < settings.min_speed => {
                self.metrics.fix_too_slow();
                (TrackingStatus::TooSlow, self.ribbons.force_idle(timestamp))
            }
            (Some(settings), Some(heading)) => {
                let computed = SwathGeometer.compute(fix.position(), heading, settings);
                let decided = RateDecider.decide(&self.store, settings, &computed);

                let mut records = Vec::new();
                for side in Side::ALL {
                    records.extend(self.ribbons.side_mut(side).advance(
                        decided.side(side).rate,
                        &computed.edge(side),
                        timestamp,
                    ));
                }

                swath = Some(computed);
                decision = Some(decided);
                (TrackingStatus::Applying, records)
            }
        };

        if status != self.status {
            tracing::debug!(from = %self.status, to = %status, "Tracking status changed");
            self.status = status;
        }

        let committed_records = self.append(records);
        let (left_rate, right_rate) = decision.map(|d| d.rates()).unwrap_or((0.0, 0.0));

        self.emit(&TelemetryRecord::from_fix(&fix, left_rate, right_rate));

        Ok(FixOutcome {
            left_rate,
            right_rate,
            status,
            committed_records,
            stats: self.stats.current(),
            swath,
            decision,
        })
    }

    /// End the session: commit open ribbons, go idle and refresh stats.
    ///
    /// Returns the number of records committed.
    pub fn stop(&mut self) -> usize {
        let timestamp = self.last_timestamp.unwrap_or_else(now_seconds);
        let records = self.ribbons.force_idle(timestamp);
        let count = records.len();

        for record in records {
            self.store.append(record);
        }
        if count > 0 {
            self.metrics.committed(count);
        }

        self.stats.refresh(&self.store);
        self.metrics.stats_recomputed();

        if let Err(e) = self.sink.flush() {
            self.metrics.telemetry_failed();
            tracing::warn!(error = %e, "Telemetry flush failed");
        }

        tracing::info!(
            committed = count,
            as_applied = self.store.as_applied().len(),
            stats = %self.stats.current(),
            "Session stopped"
        );
        count
    }

    /// Snapshot of the field data in project-file form.
    ///
    /// Open ribbons are not part of the export until committed.
    pub fn export(&self) -> Project {
        Project {
            boundaries: self.store.boundaries().to_vec(),
            prescriptions: self.store.prescriptions().to_vec(),
            as_applied: self.store.as_applied().to_vec(),
            settings: self.settings.clone(),
        }
    }

    /// Latest coverage stats.
    pub fn stats(&self) -> CoverageStats {
        self.stats.current()
    }

    /// Current settings, if any.
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Change settings mid-session. Takes effect on the next fix.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        tracing::info!(
            min_speed = settings.min_speed,
            throwing_range = settings.throwing_range,
            default_rate = settings.default_rate,
            "Settings changed"
        );
        self.settings = Some(settings);
        Ok(())
    }

    /// Field data and history.
    pub fn store(&self) -> &CoverageStore {
        &self.store
    }

    /// Ribbon state of one side.
    pub fn side(&self, side: Side) -> &SideState {
        self.ribbons.side(side)
    }

    /// Session counters, shareable with views.
    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Status after the last fix.
    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    /// Runtime options.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Telemetry sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable telemetry sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Append committed records and update stats. Returns the count.
    fn append(&mut self, records: Vec<AsAppliedRecord>) -> usize {
        let count = records.len();
        if count == 0 {
            return 0;
        }

        for record in records {
            self.store.append(record);
        }
        self.metrics.committed(count);

        if self.stats.on_commit(&self.store) {
            self.metrics.stats_recomputed();
        }

        tracing::debug!(
            records = count,
            total = self.store.as_applied().len(),
            "As-applied records appended"
        );
        count
    }

    fn emit(&mut self, record: &TelemetryRecord) {
        if let Err(e) = self.sink.emit(record) {
            self.metrics.telemetry_failed();
            tracing::warn!(error = %e, "Telemetry delivery failed");
        }
    }
}

fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1e3
}
