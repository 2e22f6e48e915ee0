//! FieldCover - real-time coverage tracking for two-sided spreaders
//!
//! Turns a stream of GPS fixes into per-side application rates, suppresses
//! double coverage, records the treated ground as as-applied polygons and
//! reports how much of the field is finished.
//!
//! # Example
//!
//! ```ignore
//! use fieldcover::{CoverageSession, Project, SessionConfig};
//!
//! let mut session = CoverageSession::new(SessionConfig::default());
//! session.load_project(Project::load_from(path)?);
//!
//! for fix in fixes {
//!     let outcome = session.process_fix(&fix)?;
//!     println!("{} / {}", outcome.left_rate, outcome.right_rate);
//! }
//! session.stop();
//! session.export().save_to(output)?;
//! ```

pub mod config;
pub mod fix_source;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod project;
pub mod rate;
pub mod ribbon;
pub mod session;
pub mod stats;
pub mod store;
pub mod swath;
pub mod telemetry;

pub use fix_source::{FixReadError, FixReader};
pub use model::{Fix, FixError, Settings, Side};
pub use project::{Project, ProjectError};
pub use session::{CoverageSession, FixOutcome, SessionConfig, TrackingStatus};
pub use stats::CoverageStats;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
