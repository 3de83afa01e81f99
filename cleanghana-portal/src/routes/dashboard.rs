//! Role dashboard endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tower_cookies::Cookies;

use cleanghana_core::Role;

use crate::error::PortalError;
use crate::geo::{PositionSource, ReverseGeocoder};
use crate::state::AppState;
use crate::store::RecordStore;
use crate::views::{AuthorityProjection, RecyclerProjection};

use super::session::{require_role, require_session};

/// GET /api/authority/dashboard
pub async fn authority_dashboard<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
) -> Result<Json<AuthorityProjection>, PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let session = require_session(&cookies, &state)?;
    require_role(&session, Role::Authority)?;

    let projection = state
        .views
        .authority_projection(&session.id)
        .ok_or_else(|| PortalError::Internal("dashboard view missing for session".to_string()))?;
    Ok(Json(projection.as_ref().clone()))
}

/// GET /api/recycler/dashboard
pub async fn recycler_dashboard<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
) -> Result<Json<RecyclerProjection>, PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let session = require_session(&cookies, &state)?;
    require_role(&session, Role::Recycler)?;

    let projection = state
        .views
        .recycler_projection(&session.id)
        .ok_or_else(|| PortalError::Internal("dashboard view missing for session".to_string()))?;
    Ok(Json(projection.as_ref().clone()))
}
