//! Portal error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Record not found")]
    RecordNotFound,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<cleanghana_core::Error> for PortalError {
    fn from(err: cleanghana_core::Error) -> Self {
        match err {
            cleanghana_core::Error::MissingField(_) => PortalError::Validation(err.to_string()),
            cleanghana_core::Error::RoleNotPermitted { .. } => {
                PortalError::Forbidden(err.to_string())
            }
            // The gateway never hands the lifecycle engine a status from a
            // foreign record type; reaching this is a bug, not bad input.
            cleanghana_core::Error::StatusMismatch { .. } => PortalError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PortalError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            PortalError::RecordNotFound => (StatusCode::NOT_FOUND, "Record not found"),
            PortalError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            PortalError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.as_str()),
            PortalError::UnknownRole(_) => (StatusCode::BAD_REQUEST, "Unknown role"),
            PortalError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "success": false, "reason": message });
        (status, axum::Json(body)).into_response()
    }
}
