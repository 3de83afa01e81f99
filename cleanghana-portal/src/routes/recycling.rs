//! Recycling pickup endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tower_cookies::Cookies;

use cleanghana_core::{Record, RecordId, Role};

use crate::error::PortalError;
use crate::geo::{PositionSource, ReverseGeocoder};
use crate::state::AppState;
use crate::store::RecordStore;
use crate::views::{apply_transition, CitizenViewModel, RecyclingRequestForm};

use super::session::{require_role, require_session};

/// POST /api/recycling
pub async fn submit_request<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
    Json(form): Json<RecyclingRequestForm>,
) -> Result<(StatusCode, Json<Record>), PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let session = require_session(&cookies, &state)?;
    require_role(&session, Role::Citizen)?;

    let citizen = CitizenViewModel::new(&state.store, session.identity);
    let record = citizen.submit_recycling_request(form)?;

    tracing::info!(id = %record.id, "Pickup request submitted");
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/recycling/:id/collect
///
/// Confirming an already-collected request returns the record unchanged.
pub async fn collect_request<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
    Path(id): Path<String>,
) -> Result<Json<Record>, PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let session = require_session(&cookies, &state)?;
    require_role(&session, Role::Recycler)?;

    let record = apply_transition(&state.store, &RecordId(id), session.role)?;
    Ok(Json(record))
}
