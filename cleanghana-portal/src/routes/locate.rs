//! Location acquisition endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tower_cookies::Cookies;

use cleanghana_core::Location;

use crate::error::PortalError;
use crate::geo::{PositionSource, ReverseGeocoder};
use crate::state::AppState;
use crate::store::RecordStore;

use super::session::require_session;

/// POST /api/locate
///
/// Runs the geolocation ladder and always yields a usable location;
/// degraded results carry their fallback marker in the address.
pub async fn locate<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
) -> Result<Json<Location>, PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    require_session(&cookies, &state)?;
    Ok(Json(state.resolver.resolve().await))
}
