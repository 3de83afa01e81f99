//! HTTP routes for the portal

mod dashboard;
mod locate;
mod recycling;
mod report;
mod session;

pub use session::SESSION_COOKIE;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::geo::{PositionSource, ReverseGeocoder};
use crate::state::AppState;
use crate::store::RecordStore;

/// Create the router with all routes
pub fn create_router<R, P, G>(state: Arc<AppState<R, P, G>>) -> Router
where
    R: RecordStore + 'static,
    P: PositionSource + 'static,
    G: ReverseGeocoder + 'static,
{
    Router::new()
        .route("/api/session_context", get(session::session_context))
        .route("/api/login", post(session::login))
        .route("/api/logout", post(session::logout))
        .route("/api/locate", post(locate::locate))
        .route("/api/reports", post(report::submit_report))
        .route("/api/reports/:id/resolve", post(report::resolve_report))
        .route("/api/recycling", post(recycling::submit_request))
        .route("/api/recycling/:id/collect", post(recycling::collect_request))
        .route("/api/authority/dashboard", get(dashboard::authority_dashboard))
        .route("/api/recycler/dashboard", get(dashboard::recycler_dashboard))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
