//! Citizen view model
//!
//! Citizens do not subscribe to the collection; they compose a resolved
//! location with form input into a [`NewRecord`] and submit it. The
//! portal keeps no form state between requests, so a failed submission
//! leaves the caller free to retry with unchanged input.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use cleanghana_core::{
    Location, MaterialType, NewRecord, Record, RecordDetails, PLACEHOLDER_IMAGE_REF,
};

use crate::error::PortalError;
use crate::identity::Identity;
use crate::store::RecordStore;

/// A captured photo as the upload path delivers it
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUpload {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImageUpload {
    /// Convert to an embeddable `data:` URI
    ///
    /// The bytes round-trip through a decode so a corrupt upload is
    /// rejected at submission time instead of surfacing on a dashboard.
    pub fn to_data_uri(&self) -> Result<String, PortalError> {
        let bytes = STANDARD
            .decode(self.data.trim())
            .map_err(|_| PortalError::Validation("image data is not valid base64".to_string()))?;
        if bytes.is_empty() {
            return Err(PortalError::Validation("image data is empty".to_string()));
        }
        Ok(format!(
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(bytes)
        ))
    }
}

/// Waste report form contents
#[derive(Debug, Clone, Deserialize)]
pub struct WasteReportForm {
    pub description: String,
    #[serde(rename = "wasteCategory", default)]
    pub waste_category: String,
    pub location: Option<Location>,
    #[serde(default)]
    pub image: Option<ImageUpload>,
}

/// Recycling pickup form contents
#[derive(Debug, Clone, Deserialize)]
pub struct RecyclingRequestForm {
    #[serde(rename = "materialType")]
    pub material_type: MaterialType,
    #[serde(rename = "quantityEstimate")]
    pub quantity_estimate: String,
    pub location: Option<Location>,
}

/// Submission path for the citizen forms
pub struct CitizenViewModel<'a, R: ?Sized> {
    store: &'a R,
    reporter: Identity,
}

impl<'a, R: RecordStore + ?Sized> CitizenViewModel<'a, R> {
    pub fn new(store: &'a R, reporter: Identity) -> Self {
        Self { store, reporter }
    }

    /// Submit a waste report; the placeholder image reference stands in
    /// when no photo was taken
    pub fn submit_waste_report(&self, form: WasteReportForm) -> Result<Record, PortalError> {
        let image_ref = match &form.image {
            Some(upload) => upload.to_data_uri()?,
            None => PLACEHOLDER_IMAGE_REF.to_string(),
        };

        let new_record = NewRecord {
            details: RecordDetails::WasteReport {
                description: form.description,
                waste_category: form.waste_category,
                image_ref,
            },
            location: form.location,
            reporter_id: self.reporter.0.clone(),
        };

        // Reject before any store call
        new_record.validate()?;
        self.store.create(new_record)
    }

    /// Submit a recycling pickup request
    pub fn submit_recycling_request(
        &self,
        form: RecyclingRequestForm,
    ) -> Result<Record, PortalError> {
        let new_record = NewRecord {
            details: RecordDetails::RecyclingRequest {
                material_type: form.material_type,
                quantity_estimate: form.quantity_estimate,
            },
            location: form.location,
            reporter_id: self.reporter.0.clone(),
        };

        new_record.validate()?;
        self.store.create(new_record)
    }
}
