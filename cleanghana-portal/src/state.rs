//! Application state
//!
//! The explicit context object handed to every route: configuration,
//! the bootstrap identity, the record store, the location resolver and
//! the session/view registries. There are no ambient globals; teardown
//! happens through the registries on logout.

use crate::config::Config;
use crate::geo::{LocationResolver, PositionSource, ReverseGeocoder};
use crate::identity::Identity;
use crate::session::SessionRegistry;
use crate::store::RecordStore;
use crate::views::ViewRegistry;

/// Portal application state
pub struct AppState<R, P, G> {
    pub config: Config,
    /// Identity resolved once at startup; stamped on created records
    pub identity: Identity,
    pub store: R,
    pub resolver: LocationResolver<P, G>,
    pub sessions: SessionRegistry,
    pub views: ViewRegistry,
}

impl<R, P, G> AppState<R, P, G>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    pub fn new(
        config: Config,
        identity: Identity,
        store: R,
        resolver: LocationResolver<P, G>,
    ) -> Self {
        Self {
            config,
            identity,
            store,
            resolver,
            sessions: SessionRegistry::new(),
            views: ViewRegistry::new(),
        }
    }
}
