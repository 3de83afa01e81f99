//! The shared record model
//!
//! A single collection holds two kinds of documents: waste reports and
//! recycling pickup requests. They share identity, location, reporter and
//! timestamp fields; the variant-specific fields live in [`RecordDetails`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::location::Location;

/// Placeholder image reference used when a citizen submits no photo.
///
/// Real object storage is out of scope; this URI is the documented
/// stand-in the dashboards render.
pub const PLACEHOLDER_IMAGE_REF: &str =
    "https://placehold.co/600x400/e2e8f0/1e293b?text=Waste+Image";

/// Unique record identifier, assigned by the store on create
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two kinds of documents sharing the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    WasteReport,
    RecyclingRequest,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::WasteReport => "waste_report",
            RecordType::RecyclingRequest => "recycling_request",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "waste_report" => Some(RecordType::WasteReport),
            "recycling_request" => Some(RecordType::RecyclingRequest),
            _ => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record sits in its lifecycle
///
/// `Pending`/`Resolved` belong to waste reports, `Ready`/`Collected` to
/// recycling requests. Each type has exactly one forward transition; see
/// [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Resolved,
    Ready,
    Collected,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Resolved => "resolved",
            RecordStatus::Ready => "ready",
            RecordStatus::Collected => "collected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RecordStatus::Pending),
            "resolved" => Some(RecordStatus::Resolved),
            "ready" => Some(RecordStatus::Ready),
            "collected" => Some(RecordStatus::Collected),
            _ => None,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Materials the recycling pickup form accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    #[serde(rename = "Plastic Bottles (PET)")]
    PetBottles,
    #[serde(rename = "Water Sachets")]
    WaterSachets,
    #[serde(rename = "Cardboard / Paper")]
    CardboardPaper,
    #[serde(rename = "Aluminum Cans")]
    AluminumCans,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::PetBottles => "Plastic Bottles (PET)",
            MaterialType::WaterSachets => "Water Sachets",
            MaterialType::CardboardPaper => "Cardboard / Paper",
            MaterialType::AluminumCans => "Aluminum Cans",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Plastic Bottles (PET)" => Some(MaterialType::PetBottles),
            "Water Sachets" => Some(MaterialType::WaterSachets),
            "Cardboard / Paper" => Some(MaterialType::CardboardPaper),
            "Aluminum Cans" => Some(MaterialType::AluminumCans),
            _ => None,
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific fields, tagged by the `type` field on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordDetails {
    WasteReport {
        description: String,
        #[serde(rename = "wasteCategory")]
        waste_category: String,
        #[serde(rename = "imageRef")]
        image_ref: String,
    },
    RecyclingRequest {
        #[serde(rename = "materialType")]
        material_type: MaterialType,
        #[serde(rename = "quantityEstimate")]
        quantity_estimate: String,
    },
}

impl RecordDetails {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordDetails::WasteReport { .. } => RecordType::WasteReport,
            RecordDetails::RecyclingRequest { .. } => RecordType::RecyclingRequest,
        }
    }
}

/// A persisted record
///
/// `id`, `created_at` and the initial `status` are assigned by the store;
/// everything else round-trips from the submitted [`NewRecord`] unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub details: RecordDetails,
    pub location: Location,
    pub status: RecordStatus,
    #[serde(rename = "reporterId")]
    pub reporter_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        self.details.record_type()
    }
}

/// A record as built by the citizen form, before the store assigns
/// identity, timestamp and initial status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(flatten)]
    pub details: RecordDetails,
    pub location: Option<Location>,
    #[serde(rename = "reporterId")]
    pub reporter_id: String,
}

impl NewRecord {
    pub fn record_type(&self) -> RecordType {
        self.details.record_type()
    }

    /// Check submission constraints: a location must be attached and the
    /// type-specific required field must be non-empty. Runs before any
    /// store call so an invalid form never produces a partial write.
    pub fn validate(&self) -> Result<(), Error> {
        let location = self
            .location
            .as_ref()
            .ok_or(Error::MissingField("location"))?;
        if location.display_address.trim().is_empty() {
            return Err(Error::MissingField("location.displayAddress"));
        }
        match &self.details {
            RecordDetails::WasteReport { description, .. } => {
                if description.trim().is_empty() {
                    return Err(Error::MissingField("description"));
                }
            }
            RecordDetails::RecyclingRequest {
                quantity_estimate, ..
            } => {
                if quantity_estimate.trim().is_empty() {
                    return Err(Error::MissingField("quantityEstimate"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_location() -> Location {
        Location::new(5.6037, -0.1870, "Legon, Accra")
    }

    fn waste_details() -> RecordDetails {
        RecordDetails::WasteReport {
            description: "Overflowing bin at market circle".to_string(),
            waste_category: "General".to_string(),
            image_ref: PLACEHOLDER_IMAGE_REF.to_string(),
        }
    }

    #[test]
    fn test_validate_requires_location() {
        let record = NewRecord {
            details: waste_details(),
            location: None,
            reporter_id: "anon-1".to_string(),
        };
        assert_eq!(record.validate(), Err(Error::MissingField("location")));
    }

    #[test]
    fn test_validate_requires_description() {
        let record = NewRecord {
            details: RecordDetails::WasteReport {
                description: "   ".to_string(),
                waste_category: "General".to_string(),
                image_ref: PLACEHOLDER_IMAGE_REF.to_string(),
            },
            location: Some(demo_location()),
            reporter_id: "anon-1".to_string(),
        };
        assert_eq!(record.validate(), Err(Error::MissingField("description")));
    }

    #[test]
    fn test_validate_requires_quantity_estimate() {
        let record = NewRecord {
            details: RecordDetails::RecyclingRequest {
                material_type: MaterialType::PetBottles,
                quantity_estimate: String::new(),
            },
            location: Some(demo_location()),
            reporter_id: "anon-1".to_string(),
        };
        assert_eq!(
            record.validate(),
            Err(Error::MissingField("quantityEstimate"))
        );
    }

    #[test]
    fn test_validate_accepts_complete_report() {
        let record = NewRecord {
            details: waste_details(),
            location: Some(demo_location()),
            reporter_id: "anon-1".to_string(),
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_record_type_tag_on_wire() {
        let json = serde_json::to_value(waste_details()).unwrap();
        assert_eq!(json["type"], "waste_report");
        assert_eq!(json["wasteCategory"], "General");

        let json = serde_json::to_value(RecordDetails::RecyclingRequest {
            material_type: MaterialType::WaterSachets,
            quantity_estimate: "2 large bags".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "recycling_request");
        assert_eq!(json["materialType"], "Water Sachets");
    }

    #[test]
    fn test_material_type_wire_strings() {
        for (material, wire) in [
            (MaterialType::PetBottles, "\"Plastic Bottles (PET)\""),
            (MaterialType::WaterSachets, "\"Water Sachets\""),
            (MaterialType::CardboardPaper, "\"Cardboard / Paper\""),
            (MaterialType::AluminumCans, "\"Aluminum Cans\""),
        ] {
            assert_eq!(serde_json::to_string(&material).unwrap(), wire);
            let parsed: MaterialType = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, material);
        }
    }
}
