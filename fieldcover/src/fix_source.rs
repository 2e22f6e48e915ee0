//! Recorded fixes for replay.
//!
//! One JSON object per line, in the shape of [`Fix`]:
//!
//! ```text
//! {"latitude":47.32,"longitude":8.2,"heading":90.0,"speed":2.1,"timestamp":"2024-04-02T12:00:00Z"}
//! ```
//!
//! Blank lines are skipped. Parse failures are reported per line so a
//! caller can skip a bad record and continue.

use std::io::BufRead;

use thiserror::Error;

use crate::model::Fix;

/// A line that could not be turned into a fix.
#[derive(Debug, Error)]
pub enum FixReadError {
    /// Reading from the source failed.
    #[error("Failed to read fix line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The line is not a valid fix object.
    #[error("Malformed fix on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl FixReadError {
    /// One-based line number of the failure.
    pub fn line(&self) -> usize {
        match self {
            FixReadError::Io { line, .. } | FixReadError::Parse { line, .. } => *line,
        }
    }
}

/// Iterator over JSON-lines fixes.
pub struct FixReader<R> {
    reader: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> FixReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for FixReader<R> {
    type Item = Result<Fix, FixReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            self.line += 1;
            let line = self.line;

            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    self.line -= 1;
                    return None;
                }
                Ok(_) => {}
                Err(source) => return Some(Err(FixReadError::Io { line, source })),
            }

            let text = self.buffer.trim();
            if text.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(text).map_err(|source| FixReadError::Parse { line, source }),
            );
        }
    }
}
