//! Domain types shared by the tracking pipeline.
//!
//! - [`Fix`]: a single GPS observation
//! - [`Settings`]: per-project spreading parameters
//! - [`Side`]: left/right of the vehicle
//! - [`Zone`] and its variants: boundary, prescription and as-applied data

mod fix;
pub(crate) mod number;
mod settings;
mod side;
mod zone;

pub use fix::{Fix, FixError};
pub use settings::{Settings, SettingsError};
pub use side::Side;
pub use zone::{
    AsAppliedRecord, Attributes, BoundaryZone, PrescriptionZone, Zone, ZoneLayer, COVERAGE_KEY,
    INNER_COVERAGE_WEIGHT, OUTER_COVERAGE_WEIGHT, PRESCRIPTION_RATE_KEY, RATE_KEY, TIMESTAMP_KEY,
};
