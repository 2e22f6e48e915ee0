//! Telemetry sinks.

use std::io::Write;

use thiserror::Error;

use super::TelemetryRecord;

/// Errors raised while delivering telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Writing to the underlying stream failed.
    #[error("Telemetry write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be serialized.
    #[error("Telemetry serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for per-fix telemetry.
///
/// Implementations should return quickly; the session calls `emit` inline
/// once per valid fix and only logs failures.
pub trait TelemetrySink: Send {
    /// Deliver one record.
    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), TelemetryError>;

    /// Flush buffered records. The default does nothing.
    fn flush(&mut self) -> Result<(), TelemetryError> {
        Ok(())
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Box<T> {
    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        (**self).emit(record)
    }

    fn flush(&mut self) -> Result<(), TelemetryError> {
        (**self).flush()
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn emit(&mut self, _record: &TelemetryRecord) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> TelemetrySink for JsonLinesSink<W> {
    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TelemetryError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TelemetryRecord>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far.
    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TelemetryRecord> {
        self.records.last()
    }

    /// Take all records, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<TelemetryRecord> {
        std::mem::take(&mut self.records)
    }
}

impl TelemetrySink for MemorySink {
    fn emit(&mut self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        self.records.push(*record);
        Ok(())
    }
}
