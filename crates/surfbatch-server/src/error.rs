// ── HTTP error responses ──
//
// Every failure leaves the server as `{ "error": "<message>" }` with a
// status derived from the core error.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use surfbatch_core::CoreError;

pub(crate) const UNAUTHENTICATED_MESSAGE: &str = "Not authenticated.";
pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid Surfsight credentials.";
pub(crate) const LOGIN_TRANSPORT_MESSAGE: &str = "Error contacting upstream API.";
pub(crate) const TRANSPORT_MESSAGE: &str = "Server error contacting upstream.";

/// A status plus the message placed in the `error` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Login failures read differently from batch failures: a dead
    /// upstream is reported as a contact error, not a batch error.
    pub(crate) fn from_login(err: CoreError) -> Self {
        match err {
            CoreError::TransportFailure { ref message } => {
                error!(error = %message, "login could not reach upstream");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, LOGIN_TRANSPORT_MESSAGE)
            }
            CoreError::UpstreamMalformed { ref message } => {
                error!(error = %message, "login response malformed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Upstream returned no token.")
            }
            other => other.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput { message } => Self::bad_request(message),
            CoreError::InvalidCredentials { message } => {
                warn!(error = %message, "login rejected");
                Self::new(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE)
            }
            CoreError::Unauthenticated => {
                Self::new(StatusCode::UNAUTHORIZED, UNAUTHENTICATED_MESSAGE)
            }
            CoreError::UpstreamRejected { status, message } => Self::new(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
            CoreError::NotFound { identifier } => {
                Self::new(StatusCode::NOT_FOUND, format!("Device not found: {identifier}"))
            }
            CoreError::TransportFailure { message } => {
                error!(error = %message, "upstream unreachable");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, TRANSPORT_MESSAGE)
            }
            other @ (CoreError::UpstreamMalformed { .. } | CoreError::Config { .. }) => {
                error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
