//! Per-fix telemetry and session metrics.
//!
//! # Architecture
//!
//! ```text
//! CoverageSession ──► TelemetryRecord ──► TelemetrySink   (per valid fix)
//!        │                                (null, JSON lines, memory)
//!        └──────────► SessionMetrics ──► MetricsSnapshot ──► Views
//!                     (atomic counters)  (point-in-time copy)
//! ```
//!
//! Sink delivery is fire-and-forget: a failing sink is logged and counted,
//! tracking state is never touched.
//!
//! # Example
//!
//! ```ignore
//! use fieldcover::telemetry::{JsonLinesSink, TelemetryRecord, TelemetrySink};
//!
//! let mut sink = JsonLinesSink::new(std::io::stdout());
//! sink.emit(&record)?;
//! ```

mod metrics;
mod record;
mod sink;
mod snapshot;

pub use metrics::SessionMetrics;
pub use record::TelemetryRecord;
pub use sink::{JsonLinesSink, MemorySink, NullSink, TelemetryError, TelemetrySink};
pub use snapshot::MetricsSnapshot;
