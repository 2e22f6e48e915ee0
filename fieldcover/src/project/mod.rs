//! Project files: import and export of field data.
//!
//! A project file is one JSON object:
//!
//! ```text
//! {
//!   "boundaries": FeatureCollection,        field outline
//!   "plan":       FeatureCollection,        prescription zones ("V22RATE")
//!   "protocol":   FeatureCollection | null, as-applied history
//!   "settings":   { "min_speed", "throwing_range", "default_rate", ... }
//! }
//! ```
//!
//! Export writes the same shape, so a session can be saved and resumed.
//! Feature properties are carried through unchanged. `protocol` is always
//! written as a FeatureCollection: a `null` or absent history comes back as
//! an empty collection. A record's `coverage` weight must lie in (0, 1].

mod geojson;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{
    AsAppliedRecord, BoundaryZone, PrescriptionZone, Settings, SettingsError, Zone, ZoneLayer,
    COVERAGE_KEY, PRESCRIPTION_RATE_KEY, RATE_KEY, TIMESTAMP_KEY,
};
use geojson::{Feature, FeatureCollection, Geometry};

/// Errors raised while reading or writing a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The project file could not be read.
    #[error("Failed to read project {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project file could not be written.
    #[error("Failed to write project {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not have the project shape.
    #[error("Malformed project document: {0}")]
    Json(#[from] serde_json::Error),

    /// A feature's geometry is unusable.
    #[error("Invalid geometry in {layer} feature {index}: {reason}")]
    InvalidGeometry {
        layer: ZoneLayer,
        index: usize,
        reason: String,
    },

    /// A feature property has the wrong type or is missing.
    #[error("Invalid property '{key}' in {layer} feature {index}: {reason}")]
    InvalidProperty {
        layer: ZoneLayer,
        index: usize,
        key: &'static str,
        reason: String,
    },

    /// The settings object holds unusable values.
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
}

/// On-disk document layout.
#[derive(Debug, Serialize, Deserialize)]
struct ProjectDocument {
    boundaries: FeatureCollection,
    plan: FeatureCollection,
    #[serde(default)]
    protocol: Option<FeatureCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settings: Option<Settings>,
}

/// Field data handed to a session: boundary, plan, history and settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    /// Field outline features.
    pub boundaries: Vec<BoundaryZone>,
    /// Prescription zones in file order.
    pub prescriptions: Vec<PrescriptionZone>,
    /// As-applied history in file order.
    pub as_applied: Vec<AsAppliedRecord>,
    /// Spreading parameters, if the file carries them.
    pub settings: Option<Settings>,
}

impl Project {
    /// Parse a project document.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Parse a project document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProjectError> {
        Self::from_document(serde_json::from_reader(reader)?)
    }

    /// Load a project file.
    pub fn load_from(path: &Path) -> Result<Self, ProjectError> {
        let content = fs::read_to_string(path).map_err(|source| ProjectError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let project = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            boundaries = project.boundaries.len(),
            prescriptions = project.prescriptions.len(),
            as_applied = project.as_applied.len(),
            "Project loaded"
        );
        Ok(project)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> Result<Value, ProjectError> {
        Ok(serde_json::to_value(self.to_document())?)
    }

    /// Write the project to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ProjectError> {
        let write_failed = |source| ProjectError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        fs::write(path, self.to_json()?).map_err(write_failed)?;

        tracing::info!(
            path = %path.display(),
            as_applied = self.as_applied.len(),
            "Project saved"
        );
        Ok(())
    }

    fn from_document(document: ProjectDocument) -> Result<Self, ProjectError> {
        let boundaries = features(document.boundaries, ZoneLayer::Boundary)
            .map(|(_, shape, properties)| Ok(BoundaryZone::new(shape?, properties)))
            .collect::<Result<Vec<_>, ProjectError>>()?;

        let prescriptions = features(document.plan, ZoneLayer::Prescription)
            .map(|(index, shape, properties)| {
                let rate = optional_number(&properties, PRESCRIPTION_RATE_KEY).map_err(|reason| {
                    invalid_property(ZoneLayer::Prescription, index, PRESCRIPTION_RATE_KEY, reason)
                })?;
                Ok(PrescriptionZone::new(shape?, rate, properties))
            })
            .collect::<Result<Vec<_>, ProjectError>>()?;

        let as_applied = features(
            document.protocol.unwrap_or_else(|| FeatureCollection::new(Vec::new())),
            ZoneLayer::AsApplied,
        )
        .map(|(index, shape, properties)| {
            let number = |key: &'static str| {
                optional_number(&properties, key)
                    .map_err(|reason| invalid_property(ZoneLayer::AsApplied, index, key, reason))
            };
            let weight = number(COVERAGE_KEY)?.ok_or_else(|| {
                invalid_property(ZoneLayer::AsApplied, index, COVERAGE_KEY, "missing".to_string())
            })?;
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(invalid_property(
                    ZoneLayer::AsApplied,
                    index,
                    COVERAGE_KEY,
                    format!("{} is outside (0, 1]", weight),
                ));
            }
            let rate = number(RATE_KEY)?.unwrap_or(0.0);
            let timestamp = number(TIMESTAMP_KEY)?.unwrap_or(0.0);

            Ok(AsAppliedRecord::new(shape?, weight, rate, timestamp, properties))
        })
        .collect::<Result<Vec<_>, ProjectError>>()?;

        if let Some(settings) = &document.settings {
            settings.validate()?;
        }

        Ok(Self {
            boundaries,
            prescriptions,
            as_applied,
            settings: document.settings,
        })
    }

    fn to_document(&self) -> ProjectDocument {
        let collection = |zones: Vec<Zone>| {
            FeatureCollection::new(
                zones
                    .iter()
                    .map(|zone| {
                        Feature::new(
                            Geometry::from_shape(zone.footprint().shape()),
                            zone.properties(),
                        )
                    })
                    .collect(),
            )
        };

        ProjectDocument {
            boundaries: collection(self.boundaries.iter().cloned().map(Zone::Boundary).collect()),
            plan: collection(
                self.prescriptions
                    .iter()
                    .cloned()
                    .map(Zone::Prescription)
                    .collect(),
            ),
            protocol: Some(collection(
                self.as_applied.iter().cloned().map(Zone::AsApplied).collect(),
            )),
            settings: self.settings.clone(),
        }
    }
}

type ParsedFeature = (
    usize,
    Result<crate::geometry::Shape, ProjectError>,
    Option<Map<String, Value>>,
);

/// Index, converted shape and properties of each feature in a layer.
fn features(collection: FeatureCollection, layer: ZoneLayer) -> impl Iterator<Item = ParsedFeature> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(move |(index, feature)| {
            let shape = feature
                .geometry
                .into_shape()
                .map_err(|reason| ProjectError::InvalidGeometry {
                    layer,
                    index,
                    reason,
                });
            (index, shape, feature.properties)
        })
}

/// A numeric property. `null` and absence both read as `None`.
fn optional_number(properties: &Option<Map<String, Value>>, key: &str) -> Result<Option<f64>, String> {
    match properties.as_ref().and_then(|props| props.get(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{} is not representable as a number", n)),
        Some(other) => Err(format!("expected a number, got {}", other)),
    }
}

fn invalid_property(layer: ZoneLayer, index: usize, key: &'static str, reason: String) -> ProjectError {
    ProjectError::InvalidProperty {
        layer,
        index,
        key,
        reason,
    }
}
