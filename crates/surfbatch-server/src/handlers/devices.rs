// Batch device endpoints: validate, billing, quality.
//
// Bodies are parsed loosely and checked here so every shape problem
// comes back as a 400 `{error}` instead of an extractor rejection.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use surfbatch_core::{BillingStatus, Imei, OperationRequest, OutcomeRecord, QualityLevel};

use crate::AppState;
use crate::cookie::extract_session_id;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DevicesRequest {
    #[serde(default)]
    imeis: Option<Vec<String>>,
    #[serde(default)]
    billing_status: Option<String>,
    #[serde(default)]
    quality_level: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultsResponse {
    results: Vec<OutcomeRecord>,
}

impl DevicesRequest {
    fn identifiers(&self) -> Result<Vec<Imei>, ApiError> {
        let raw = self.imeis.as_deref().unwrap_or_default();
        if raw.is_empty() {
            return Err(ApiError::bad_request("IMEI list is required"));
        }
        raw.iter()
            .map(|s| Imei::parse(s).map_err(ApiError::from))
            .collect()
    }

    fn billing_status(&self) -> Result<BillingStatus, ApiError> {
        let raw = self
            .billing_status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("billingStatus is required"))?;
        raw.trim()
            .parse()
            .map_err(|_| ApiError::bad_request(format!("unknown billing status '{raw}'")))
    }

    fn quality_level(&self) -> Result<QualityLevel, ApiError> {
        let value = self
            .quality_level
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::bad_request("qualityLevel must be an integer"))?;
        QualityLevel::new(value).map_err(ApiError::from)
    }
}

/// `POST /api/devices/validate`
pub(crate) async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DevicesRequest>, JsonRejection>,
) -> Result<Json<ResultsResponse>, ApiError> {
    run(&state, &headers, body, |req| {
        OperationRequest::validate(req.identifiers()?).map_err(ApiError::from)
    })
    .await
}

/// `POST /api/devices/billing`
pub(crate) async fn billing(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DevicesRequest>, JsonRejection>,
) -> Result<Json<ResultsResponse>, ApiError> {
    run(&state, &headers, body, |req| {
        let identifiers = req.identifiers()?;
        OperationRequest::set_billing_status(identifiers, req.billing_status()?)
            .map_err(ApiError::from)
    })
    .await
}

/// `POST /api/devices/quality`
pub(crate) async fn quality(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DevicesRequest>, JsonRejection>,
) -> Result<Json<ResultsResponse>, ApiError> {
    run(&state, &headers, body, |req| {
        let identifiers = req.identifiers()?;
        OperationRequest::set_quality_level(identifiers, req.quality_level()?)
            .map_err(ApiError::from)
    })
    .await
}

/// Session gate, body check, then the batch itself.
///
/// The session is checked before the body so an unauthenticated caller
/// always sees 401.
async fn run(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<DevicesRequest>, JsonRejection>,
    build: impl FnOnce(&DevicesRequest) -> Result<OperationRequest, ApiError>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let id = extract_session_id(headers);
    state.service.status(id.as_ref())?;

    let Json(req) = body?;
    let request = build(&req)?;
    let results = state.service.execute(id.as_ref(), &request).await?;
    Ok(Json(ResultsResponse { results }))
}
