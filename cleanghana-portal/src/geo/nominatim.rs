//! Reverse geocoding via OpenStreetMap Nominatim

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Why a reverse lookup failed; always recoverable at the resolver
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Geocoder returned status {0}")]
    Status(u16),

    #[error("Geocoder response unparseable: {0}")]
    Parse(String),
}

/// Best-effort coordinate-to-address lookup
pub trait ReverseGeocoder: Send + Sync {
    /// Look up the full display name for the coordinates
    fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<String, GeocodeError>> + Send;
}

/// Public Nominatim endpoint; no API key required
const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: String,
}

/// HTTP reverse geocoder against the Nominatim API
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_BASE_URL)
    }

    /// Point the geocoder at a custom endpoint (testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            // Nominatim's usage policy requires an identifying agent
            .user_agent("cleanghana-portal/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<String, GeocodeError> {
        let url = format!(
            "{}/reverse?format=json&lat={latitude}&lon={longitude}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        Ok(body.display_name)
    }
}
