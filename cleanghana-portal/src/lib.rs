//! CleanGhana Portal
//!
//! The hosted service behind the three CleanGhana role portals:
//! citizens submit waste reports and recycling pickup requests,
//! the sanitation authority resolves reports, recyclers collect
//! requests. One shared record collection, kept live for every
//! dashboard through store subscriptions.

pub mod config;
pub mod error;
pub mod geo;
pub mod identity;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod views;

pub use config::Config;
pub use error::PortalError;
pub use geo::{
    FixedPositionSource, GeocodeError, LocationResolver, NominatimGeocoder, Position,
    PositionError, PositionSource, ReverseGeocoder, UnsupportedPositionSource,
};
pub use identity::{AnonymousIdentityProvider, Identity, IdentityProvider};
pub use session::{Session, SessionId, SessionRegistry};
pub use state::AppState;
pub use store::{
    InMemoryRecordStore, RecordFilter, RecordStore, SqliteRecordStore, StoreResult, Subscription,
};
pub use views::{
    AuthorityProjection, AuthorityViewModel, CitizenViewModel, RecyclerProjection,
    RecyclerViewModel, ViewRegistry,
};
