// ── Per-identifier results ──

use serde::{Deserialize, Serialize};

use crate::model::{Imei, QualityLevel};

/// Coarse classification of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Ok,
    NotFound,
    Failed,
}

/// Operation-specific pass-through fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomePayload {
    /// Upstream's own message, if it sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Normalized label (validate) or target status (billing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_status: Option<String>,
    /// Billing status exactly as upstream reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_status_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_level: Option<QualityLevel>,
}

/// The canonical result for one identifier in one batch.
///
/// Exactly one record exists per input identifier for every operation
/// that produces results, including when the upstream call never
/// completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    #[serde(rename = "imei")]
    pub identifier: Imei,
    /// Whether the device exists upstream. Only set by validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    pub ok: bool,
    /// Upstream HTTP status; 0 when validation never got a response.
    #[serde(rename = "statusCode")]
    pub http_status: u16,
    #[serde(rename = "detail")]
    pub primary_detail: String,
    #[serde(flatten)]
    pub payload: OutcomePayload,
}

impl OutcomeRecord {
    pub fn outcome(&self) -> Outcome {
        if self.ok {
            Outcome::Ok
        } else if self.found == Some(false) && self.http_status == 404 {
            Outcome::NotFound
        } else {
            Outcome::Failed
        }
    }
}

/// Counts over one batch's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[OutcomeRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut acc, record| {
                acc.total += 1;
                match record.outcome() {
                    Outcome::Ok => acc.succeeded += 1,
                    Outcome::NotFound => acc.not_found += 1,
                    Outcome::Failed => acc.failed += 1,
                }
                acc
            })
    }
}
