// Login, status and logout.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::cookie::{SessionCookie, extract_session_id};
use crate::error::ApiError;

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    ok: bool,
    organization_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusResponse {
    ok: bool,
    email: String,
    organization_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutResponse {
    ok: bool,
}

/// `POST /api/auth/login`
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let email = req.email.unwrap_or_default();
    let password = SecretString::from(req.password.unwrap_or_default());

    let (id, session) = state
        .service
        .login(&email, &password)
        .await
        .map_err(ApiError::from_login)?;

    let cookie = SessionCookie::new(&id, state.cookie_max_age(), state.options.secure_cookies);
    let body = LoginResponse {
        ok: true,
        organization_id: session.organization_id.clone(),
    };
    Ok(with_cookie(Json(body), &cookie))
}

/// `GET /api/auth/status`
pub(crate) async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = extract_session_id(&headers);
    let account = state.service.status(id.as_ref())?;
    Ok(Json(StatusResponse {
        ok: true,
        email: account.email,
        organization_id: account.organization_id,
    }))
}

/// `POST /api/auth/logout`
///
/// Always clears the cookie, whether or not a session was live.
pub(crate) async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = extract_session_id(&headers);
    state.service.logout(id.as_ref());
    let cookie = SessionCookie::clear(state.options.secure_cookies);
    with_cookie(Json(LogoutResponse { ok: true }), &cookie)
}

fn with_cookie(body: impl IntoResponse, cookie: &SessionCookie) -> Response {
    let mut resp = body.into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie.to_header_value()) {
        resp.headers_mut().insert(SET_COOKIE, value);
    }
    resp
}
