//! Session endpoints: role selection, context, logout

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use cleanghana_core::Role;

use crate::error::PortalError;
use crate::geo::{PositionSource, ReverseGeocoder};
use crate::session::{Session, SessionId};
use crate::state::AppState;
use crate::store::RecordStore;
use crate::views::RoleView;

pub const SESSION_COOKIE: &str = "cleanghana_session";

#[derive(Serialize)]
pub struct SessionContext {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "serverTime")]
    pub server_time: i64,
}

/// GET /api/session_context
pub async fn session_context<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
) -> Json<SessionContext>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let context = match get_session_from_cookies(&cookies, &state) {
        Some(session) => SessionContext {
            authenticated: true,
            identity: Some(session.identity.0),
            role: Some(session.role),
            server_time: chrono::Utc::now().timestamp(),
        },
        None => SessionContext {
            authenticated: false,
            identity: None,
            role: None,
            server_time: chrono::Utc::now().timestamp(),
        },
    };

    Json(context)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
}

/// POST /api/login
///
/// Picking a role replaces any session the caller already had; the old
/// session's view model is torn down first.
pub async fn login<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, PortalError>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    let role = Role::from_str(&req.role).ok_or(PortalError::UnknownRole(req.role))?;

    if let Some(previous) = get_session_from_cookies(&cookies, &state) {
        state.views.remove(&previous.id);
        state.sessions.logout(&previous.id);
    }

    let session = state.sessions.login(state.identity.clone(), role);
    state
        .views
        .insert(session.id.clone(), RoleView::for_role(role, &state.store));
    set_session_cookie(&cookies, &session.id.0);

    tracing::info!(role = %role, session = %session.id.0, "Role session started");

    Ok(Json(LoginResponse {
        success: true,
        role,
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /api/logout
///
/// Idempotent; logging out without a session still succeeds.
pub async fn logout<R, P, G>(
    State(state): State<Arc<AppState<R, P, G>>>,
    cookies: Cookies,
) -> Json<LogoutResponse>
where
    R: RecordStore,
    P: PositionSource,
    G: ReverseGeocoder,
{
    if let Some(session) = get_session_from_cookies(&cookies, &state) {
        state.views.remove(&session.id);
        state.sessions.logout(&session.id);
    }

    clear_session_cookie(&cookies);

    Json(LogoutResponse { success: true })
}

/// Helper to get the current session from cookies
pub fn get_session_from_cookies<R, P, G>(
    cookies: &Cookies,
    state: &AppState<R, P, G>,
) -> Option<Session> {
    cookies.get(SESSION_COOKIE).and_then(|c| {
        let session_id = SessionId(c.value().to_string());
        state.sessions.get(&session_id)
    })
}

/// Helper requiring an authenticated session
pub fn require_session<R, P, G>(
    cookies: &Cookies,
    state: &AppState<R, P, G>,
) -> Result<Session, PortalError> {
    get_session_from_cookies(cookies, state).ok_or(PortalError::NotAuthenticated)
}

/// Helper requiring the session to hold a specific role
pub fn require_role(session: &Session, role: Role) -> Result<(), PortalError> {
    if session.role == role {
        Ok(())
    } else {
        Err(PortalError::Forbidden(format!(
            "requires the {role} role"
        )))
    }
}

/// Helper to set the session cookie
fn set_session_cookie(cookies: &Cookies, session_id: &str) {
    use tower_cookies::Cookie;
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .build();
    cookies.add(cookie);
}

/// Helper to clear the session cookie
fn clear_session_cookie(cookies: &Cookies) {
    use tower_cookies::Cookie;
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(tower_cookies::cookie::time::Duration::ZERO)
        .build();
    cookies.add(cookie);
}
