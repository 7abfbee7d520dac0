//! Field records exchanged with the persistence service
//!
//! JSON field names follow the server's field DTO (`fieldName`,
//! `crop_type`, `areaHectares`, ...).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geodesy::round_hectares;
use crate::point::Point;
use crate::ring::{MIN_RING_VERTICES, Ring};
use crate::sketch::Sketch;

/// Crop type sent when the user leaves it blank
pub const UNSPECIFIED_CROP: &str = "Не указана";

/// Payload validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Field boundary needs at least 3 coordinates, got {0}")]
    TooFewCoordinates(usize),

    #[error("Coordinate {index} is not a finite number")]
    NonFiniteCoordinate { index: usize },

    #[error("Hole {hole} needs at least 3 coordinates, got {len}")]
    HoleTooSmall { hole: usize, len: usize },

    #[error("Coordinate {index} of hole {hole} is not a finite number")]
    NonFiniteHoleCoordinate { hole: usize, index: usize },
}

/// Cultivation status of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldStatus {
    #[default]
    #[serde(rename = "Активное")]
    Active,
    #[serde(rename = "Неактивное")]
    Inactive,
    #[serde(rename = "Под паром")]
    Fallow,
    #[serde(rename = "На обработке")]
    InTreatment,
}

impl FieldStatus {
    /// Get the display name of the status
    pub fn name(&self) -> &'static str {
        match self {
            FieldStatus::Active => "Active",
            FieldStatus::Inactive => "Inactive",
            FieldStatus::Fallow => "Fallow",
            FieldStatus::InTreatment => "In treatment",
        }
    }

    /// Status string as stored by the server
    pub fn wire_name(&self) -> &'static str {
        match self {
            FieldStatus::Active => "Активное",
            FieldStatus::Inactive => "Неактивное",
            FieldStatus::Fallow => "Под паром",
            FieldStatus::InTreatment => "На обработке",
        }
    }

    /// Parse a server status string; unknown values give None
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|status| status.wire_name() == value.trim())
    }

    /// Get all statuses
    pub fn all() -> [FieldStatus; 4] {
        [
            FieldStatus::Active,
            FieldStatus::Inactive,
            FieldStatus::Fallow,
            FieldStatus::InTreatment,
        ]
    }
}

/// Descriptive attributes entered alongside the field name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldAttributes {
    /// Crop grown on the field; blank means unspecified
    #[serde(default)]
    pub crop_type: String,
    #[serde(default)]
    pub status: FieldStatus,
}

/// Body of a create-field request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPayload {
    #[serde(rename = "fieldName")]
    pub name: String,
    pub crop_type: String,
    pub status: FieldStatus,
    /// Net area rounded to two decimals
    #[serde(rename = "areaHectares")]
    pub area_hectares: f64,
    /// Outer ring in canonical order
    pub coordinates: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holes: Option<Vec<Vec<Point>>>,
}

impl FieldPayload {
    /// Snapshot a sketch into a payload
    ///
    /// Only completed holes are included; a hole still being drawn is not
    /// part of the committed shape.
    pub fn from_sketch(sketch: &Sketch, name: &str, attributes: &FieldAttributes) -> Self {
        let crop_type = attributes.crop_type.trim();
        let holes: Vec<Vec<Point>> = sketch
            .holes()
            .iter()
            .map(|ring| ring.points().to_vec())
            .collect();

        Self {
            name: name.trim().to_string(),
            crop_type: if crop_type.is_empty() {
                UNSPECIFIED_CROP.to_string()
            } else {
                crop_type.to_string()
            },
            status: attributes.status,
            area_hectares: round_hectares(sketch.committed_area()),
            coordinates: sketch.outer().ring().points().to_vec(),
            holes: if holes.is_empty() { None } else { Some(holes) },
        }
    }

    /// Check the payload describes a usable polygon
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.coordinates.len() < MIN_RING_VERTICES {
            return Err(PayloadError::TooFewCoordinates(self.coordinates.len()));
        }
        if let Some(index) = self.coordinates.iter().position(|p| !p.is_finite()) {
            return Err(PayloadError::NonFiniteCoordinate { index });
        }
        for (hole, points) in self.holes.iter().flatten().enumerate() {
            if points.len() < MIN_RING_VERTICES {
                return Err(PayloadError::HoleTooSmall {
                    hole,
                    len: points.len(),
                });
            }
            if let Some(index) = points.iter().position(|p| !p.is_finite()) {
                return Err(PayloadError::NonFiniteHoleCoordinate { hole, index });
            }
        }
        Ok(())
    }
}

/// A persisted field as returned by the server
///
/// Crop type and status are free text on the server side and may be null,
/// so they are kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Server-assigned identifier
    pub id: i64,
    #[serde(rename = "fieldName")]
    pub name: String,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "areaHectares")]
    pub area_hectares: f64,
    pub coordinates: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holes: Option<Vec<Vec<Point>>>,
    /// Creation timestamp as sent by the server (ISO-8601)
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl FieldRecord {
    /// Build the record a store returns for an accepted payload
    pub fn from_payload(id: i64, payload: FieldPayload, created_at: Option<String>) -> Self {
        Self {
            id,
            name: payload.name,
            crop_type: Some(payload.crop_type),
            status: Some(payload.status.wire_name().to_string()),
            area_hectares: payload.area_hectares,
            coordinates: payload.coordinates,
            holes: payload.holes,
            created_at,
        }
    }

    /// Known status, if the server sent one of the standard values
    pub fn known_status(&self) -> Option<FieldStatus> {
        self.status.as_deref().and_then(FieldStatus::from_wire)
    }

    /// Outer boundary as a ring
    pub fn outer(&self) -> Ring {
        Ring::from_points(self.coordinates.clone())
    }

    /// Holes as rings
    pub fn hole_rings(&self) -> Vec<Ring> {
        self.holes
            .iter()
            .flatten()
            .map(|points| Ring::from_points(points.clone()))
            .collect()
    }
}
