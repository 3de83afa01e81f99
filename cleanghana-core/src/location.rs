//! Geographic location attached to a record

use serde::{Deserialize, Serialize};

/// A resolved position with a human-readable address
///
/// `display_address` is always non-empty: either a geocoded string, a
/// coordinate rendering, or one of the documented demo fallbacks. A
/// location is immutable once attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    #[serde(rename = "displayAddress")]
    pub display_address: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, display_address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            display_address: display_address.into(),
        }
    }

    /// Render coordinates the way the address fallbacks do: 4 decimals
    pub fn coordinate_string(latitude: f64, longitude: f64) -> String {
        format!("Lat: {latitude:.4}, Lng: {longitude:.4}")
    }
}
