//! CleanGhana Portal
//!
//! Hosted service for citizen waste reporting and recycling pickup
//! coordination: one shared record collection, three role portals.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cleanghana_portal::{
    identity, routes, AnonymousIdentityProvider, AppState, Config, InMemoryRecordStore,
    LocationResolver, NominatimGeocoder, RecordStore, SqliteRecordStore,
    UnsupportedPositionSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cleanghana_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        app_id = %config.app_id,
        collection = %config.collection_path(),
        "Loaded configuration"
    );

    // Resolve the startup identity
    let provider = AnonymousIdentityProvider::new();
    let identity = identity::bootstrap_identity(&provider, config.auth_token.as_deref())?;
    tracing::info!(identity = %identity, "Identity resolved");

    // Pick the record store
    let store: Box<dyn RecordStore> = match &config.database {
        Some(path) => {
            tracing::info!(path = %path, "Using SQLite record store");
            Box::new(SqliteRecordStore::open(path, config.collection_path())?)
        }
        None => {
            tracing::info!("Using in-memory record store");
            Box::new(InMemoryRecordStore::new())
        }
    };

    // The portal host has no positioning capability of its own; the
    // resolver degrades to the demo fallback, and geocoding is wired for
    // deployments that supply a position source.
    let resolver = LocationResolver::new(UnsupportedPositionSource, NominatimGeocoder::new());

    let port = config.port;
    let state = Arc::new(AppState::new(config, identity, store, resolver));

    // Create router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Portal listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
