//! Best-effort current-location producer
//!
//! `resolve()` never fails outward. It degrades through a fixed ladder:
//!
//! 1. no positioning capability -> demo coordinates, default fallback
//!    address
//! 2. positioning fails (denied / unavailable / timeout) -> demo
//!    coordinates, demo fallback address
//! 3. positioning succeeds, geocoding succeeds -> first three
//!    comma-separated segments of the display name
//! 4. positioning succeeds, geocoding fails -> coordinate string marked
//!    `(Geocoding Failed)`
//!
//! Nothing is persisted; each call is single-shot and a new call simply
//! supersedes the previous result.

use cleanghana_core::Location;

use super::nominatim::ReverseGeocoder;
use super::position::PositionSource;

/// Demo fallback coordinates: Legon, Accra
pub const FALLBACK_LATITUDE: f64 = 5.6037;
pub const FALLBACK_LONGITUDE: f64 = -0.1870;

/// Address used when the platform has no positioning capability
pub const DEFAULT_FALLBACK_ADDRESS: &str = "Legon, Accra (Default Fallback)";

/// Address used when positioning is denied or unavailable
pub const DEMO_FALLBACK_ADDRESS: &str = "Legon, Accra (Demo Location Fallback)";

pub struct LocationResolver<P, G> {
    position_source: P,
    geocoder: G,
}

impl<P: PositionSource, G: ReverseGeocoder> LocationResolver<P, G> {
    pub fn new(position_source: P, geocoder: G) -> Self {
        Self {
            position_source,
            geocoder,
        }
    }

    /// Produce the current location, degrading to the documented
    /// fallbacks rather than erroring
    pub async fn resolve(&self) -> Location {
        if !self.position_source.supported() {
            return Location::new(
                FALLBACK_LATITUDE,
                FALLBACK_LONGITUDE,
                DEFAULT_FALLBACK_ADDRESS,
            );
        }

        let position = match self.position_source.current_position().await {
            Ok(position) => position,
            Err(err) => {
                tracing::warn!("Location retrieval failed ({}), using demo location", err);
                return Location::new(
                    FALLBACK_LATITUDE,
                    FALLBACK_LONGITUDE,
                    DEMO_FALLBACK_ADDRESS,
                );
            }
        };

        match self
            .geocoder
            .reverse(position.latitude, position.longitude)
            .await
        {
            Ok(display_name) if !display_name.trim().is_empty() => {
                // Keep the first three comma-separated segments, e.g.
                // "Street, City, Region"
                let address = display_name
                    .split(',')
                    .take(3)
                    .collect::<Vec<_>>()
                    .join(",");
                Location::new(position.latitude, position.longitude, address)
            }
            Ok(_) => Location::new(
                position.latitude,
                position.longitude,
                Location::coordinate_string(position.latitude, position.longitude),
            ),
            Err(err) => {
                tracing::warn!("Geocoding failed, but GPS coordinates retrieved: {}", err);
                Location::new(
                    position.latitude,
                    position.longitude,
                    format!(
                        "{} (Geocoding Failed)",
                        Location::coordinate_string(position.latitude, position.longitude)
                    ),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::nominatim::GeocodeError;
    use crate::geo::position::{
        FixedPositionSource, Position, PositionError, UnsupportedPositionSource,
    };

    struct FailingPositionSource(PositionError);

    impl PositionSource for FailingPositionSource {
        async fn current_position(&self) -> Result<Position, PositionError> {
            Err(self.0)
        }
    }

    struct StaticGeocoder(String);

    impl ReverseGeocoder for StaticGeocoder {
        async fn reverse(&self, _lat: f64, _lng: f64) -> Result<String, GeocodeError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGeocoder;

    impl ReverseGeocoder for FailingGeocoder {
        async fn reverse(&self, _lat: f64, _lng: f64) -> Result<String, GeocodeError> {
            Err(GeocodeError::Request("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_no_capability_resolves_to_default_fallback() {
        let resolver = LocationResolver::new(UnsupportedPositionSource, FailingGeocoder);
        let location = resolver.resolve().await;

        assert_eq!(location.latitude, FALLBACK_LATITUDE);
        assert_eq!(location.longitude, FALLBACK_LONGITUDE);
        assert!(location.display_address.contains("Default Fallback"));
    }

    #[tokio::test]
    async fn test_positioning_failure_resolves_to_demo_fallback() {
        for err in [
            PositionError::PermissionDenied,
            PositionError::Unavailable,
            PositionError::Timeout,
        ] {
            let resolver = LocationResolver::new(
                FailingPositionSource(err),
                StaticGeocoder("should not be consulted".to_string()),
            );
            let location = resolver.resolve().await;

            assert_eq!(location.latitude, FALLBACK_LATITUDE);
            assert_eq!(location.longitude, FALLBACK_LONGITUDE);
            assert_eq!(location.display_address, DEMO_FALLBACK_ADDRESS);
        }
    }

    #[tokio::test]
    async fn test_geocoded_address_keeps_first_three_segments() {
        let resolver = LocationResolver::new(
            FixedPositionSource::new(5.6500, -0.1869),
            StaticGeocoder(
                "University of Ghana, Legon, Greater Accra Region, Ghana, West Africa".to_string(),
            ),
        );
        let location = resolver.resolve().await;

        assert_eq!(location.latitude, 5.65);
        assert_eq!(
            location.display_address,
            "University of Ghana, Legon, Greater Accra Region"
        );
    }

    #[tokio::test]
    async fn test_short_display_name_is_kept_whole() {
        let resolver = LocationResolver::new(
            FixedPositionSource::new(5.65, -0.1869),
            StaticGeocoder("Legon, Accra".to_string()),
        );
        let location = resolver.resolve().await;
        assert_eq!(location.display_address, "Legon, Accra");
    }

    #[tokio::test]
    async fn test_empty_display_name_degrades_to_coordinates() {
        let resolver = LocationResolver::new(
            FixedPositionSource::new(5.65, -0.1869),
            StaticGeocoder(String::new()),
        );
        let location = resolver.resolve().await;
        assert_eq!(location.display_address, "Lat: 5.6500, Lng: -0.1869");
    }

    #[tokio::test]
    async fn test_geocoding_failure_marks_address() {
        let resolver =
            LocationResolver::new(FixedPositionSource::new(5.6500, -0.1869), FailingGeocoder);
        let location = resolver.resolve().await;

        assert_eq!(location.latitude, 5.65);
        assert_eq!(
            location.display_address,
            "Lat: 5.6500, Lng: -0.1869 (Geocoding Failed)"
        );
    }

    #[tokio::test]
    async fn test_resolution_always_yields_a_non_empty_address() {
        // capability x permission x geocoding ladder
        let cases: Vec<Location> = vec![
            LocationResolver::new(UnsupportedPositionSource, FailingGeocoder)
                .resolve()
                .await,
            LocationResolver::new(
                FailingPositionSource(PositionError::PermissionDenied),
                FailingGeocoder,
            )
            .resolve()
            .await,
            LocationResolver::new(
                FixedPositionSource::new(5.65, -0.1869),
                StaticGeocoder("Legon, Accra, Ghana".to_string()),
            )
            .resolve()
            .await,
            LocationResolver::new(FixedPositionSource::new(5.65, -0.1869), FailingGeocoder)
                .resolve()
                .await,
        ];

        for location in cases {
            assert!(!location.display_address.trim().is_empty());
        }
    }
}
