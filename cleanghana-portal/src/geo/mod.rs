//! Geolocation: device positioning plus best-effort reverse geocoding
//!
//! [`LocationResolver`] combines both into a single "current location"
//! producer that never fails outward; see [`resolver`] for the
//! degradation ladder.

pub mod nominatim;
pub mod position;
pub mod resolver;

pub use nominatim::{GeocodeError, NominatimGeocoder, ReverseGeocoder};
pub use position::{
    FixedPositionSource, Position, PositionError, PositionSource, UnsupportedPositionSource,
};
pub use resolver::LocationResolver;
