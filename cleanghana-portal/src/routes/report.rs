//! Waste report endpoints

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
use crate::views::{apply_transition, CitizenViewModel, WasteReportForm};

use super::session::{require_role, require_session};

/// POST /api/reports
pub async fn submit_report<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
    Json(form): Json<WasteReportForm>,
) -> Result<(StatusCode, Json<Record>), PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let session = require_session(&cookies, &state)?;
    require_role(&session, Role::Citizen)?;

    let citizen = CitizenViewModel::new(&state.store, session.identity);
    let record = citizen.submit_waste_report(form)?;

    tracing::info!(id = %record.id, "Waste report submitted");
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/reports/:id/resolve
///
/// Resolving an already-resolved report returns the record unchanged.
pub async fn resolve_report<R, P, G>(
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
    require_role(&session, Role::Authority)?;

    let record = apply_transition(&state.store, &RecordId(id), session.role)?;
    Ok(Json(record))
}
