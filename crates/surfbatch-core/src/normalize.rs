// ── Result normalization ──
//
// Pure mapping from one upstream answer (or transport failure) to an
// `OutcomeRecord`. Holds the billing-label table and the detail-priority
// chain; knows nothing about sessions or loops.

use surfbatch_api::{BillingStatusData, Envelope, RawResponse};

use crate::model::{
    BillingStatus, Imei, Operation, OutcomePayload, OutcomeRecord, QualityLevel,
};

pub const NOT_FOUND_DETAIL: &str = "Device not found";
pub const VALIDATION_ERROR_DETAIL: &str = "Server error during validation";
pub const QUALITY_ERROR_DETAIL: &str = "Server error updating quality";

/// Status recorded when a quality update never got a response.
pub const QUALITY_TRANSPORT_STATUS: u16 = 500;

/// Raw value upstream uses for "no billing status yet".
const NOT_SET_RAW: &str = "billingStatusNotSet";

/// Map a raw upstream billing status to its display label.
///
/// Matching is case-insensitive. Unknown values pass through unchanged;
/// an absent or empty value reads as "Not Set".
pub fn billing_status_label(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return "Not Set".into();
    };
    if raw.eq_ignore_ascii_case(NOT_SET_RAW) {
        return "Not Set".into();
    }
    match raw.parse::<BillingStatus>() {
        Ok(status) => status.label().into(),
        Err(_) => raw.to_owned(),
    }
}

/// Upstream's `message`, then its `error`, then `"HTTP {status}"`.
pub fn detail_chain(resp: &RawResponse) -> String {
    resp.error_detail()
        .unwrap_or_else(|| format!("HTTP {}", resp.status))
}

/// Normalize one identifier's upstream result for the given operation.
pub fn normalize(
    operation: Operation,
    imei: &Imei,
    result: Result<&RawResponse, &surfbatch_api::Error>,
) -> OutcomeRecord {
    match operation {
        Operation::Validate => validate_outcome(imei, result),
        Operation::SetBillingStatus(status) => billing_outcome(imei, status, result),
        Operation::SetQualityLevel(level) => quality_outcome(imei, level, result),
    }
}

/// Billing-status lookup result for one identifier.
pub fn validate_outcome(
    imei: &Imei,
    result: Result<&RawResponse, &surfbatch_api::Error>,
) -> OutcomeRecord {
    let resp = match result {
        Ok(resp) => resp,
        Err(_) => {
            return OutcomeRecord {
                identifier: imei.clone(),
                found: Some(false),
                ok: false,
                http_status: 0,
                primary_detail: VALIDATION_ERROR_DETAIL.into(),
                payload: OutcomePayload {
                    message: Some(VALIDATION_ERROR_DETAIL.into()),
                    ..OutcomePayload::default()
                },
            };
        }
    };

    if resp.is_not_found() {
        return OutcomeRecord {
            identifier: imei.clone(),
            found: Some(false),
            ok: false,
            http_status: resp.status,
            primary_detail: NOT_FOUND_DETAIL.into(),
            payload: OutcomePayload {
                message: Some(NOT_FOUND_DETAIL.into()),
                ..OutcomePayload::default()
            },
        };
    }

    // Any other error status means the lookup failed, not that the device
    // exists with no billing status; the record says so instead of "Not Set".
    if !resp.is_success() {
        let detail = detail_chain(resp);
        return OutcomeRecord {
            identifier: imei.clone(),
            found: Some(false),
            ok: false,
            http_status: resp.status,
            primary_detail: detail,
            payload: OutcomePayload {
                message: resp.error_detail(),
                ..OutcomePayload::default()
            },
        };
    }

    // An unparseable 2xx body reads the same as "status not set".
    let raw = resp
        .decode::<Envelope<BillingStatusData>>()
        .and_then(|env| env.data)
        .and_then(|data| data.billing_status)
        .filter(|s| !s.is_empty());
    let label = billing_status_label(raw.as_deref());

    OutcomeRecord {
        identifier: imei.clone(),
        found: Some(true),
        ok: true,
        http_status: resp.status,
        primary_detail: label.clone(),
        payload: OutcomePayload {
            billing_status: Some(label),
            billing_status_raw: Some(raw.unwrap_or_else(|| NOT_SET_RAW.into())),
            ..OutcomePayload::default()
        },
    }
}

/// One identifier's share of a bulk billing write.
///
/// Upstream answers the bulk call with a single status, so every
/// identifier in the list gets the same record shape.
pub fn billing_outcome(
    imei: &Imei,
    status: BillingStatus,
    result: Result<&RawResponse, &surfbatch_api::Error>,
) -> OutcomeRecord {
    let (ok, http_status, detail, message) = match result {
        Ok(resp) if resp.is_success() => (true, resp.status, status.label().to_owned(), None),
        Ok(resp) => (false, resp.status, detail_chain(resp), resp.error_detail()),
        Err(e) => (false, 0, e.to_string(), None),
    };

    OutcomeRecord {
        identifier: imei.clone(),
        found: None,
        ok,
        http_status,
        primary_detail: detail,
        payload: OutcomePayload {
            message,
            billing_status: Some(status.as_upstream().to_owned()),
            ..OutcomePayload::default()
        },
    }
}

/// Data-profile write result for one identifier.
pub fn quality_outcome(
    imei: &Imei,
    level: QualityLevel,
    result: Result<&RawResponse, &surfbatch_api::Error>,
) -> OutcomeRecord {
    let (ok, http_status, detail, message) = match result {
        Ok(resp) if resp.is_success() => (true, resp.status, level.label(), resp.error_detail()),
        Ok(resp) => (false, resp.status, detail_chain(resp), resp.error_detail()),
        Err(_) => (
            false,
            QUALITY_TRANSPORT_STATUS,
            QUALITY_ERROR_DETAIL.to_owned(),
            Some(QUALITY_ERROR_DETAIL.to_owned()),
        ),
    };

    OutcomeRecord {
        identifier: imei.clone(),
        found: None,
        ok,
        http_status,
        primary_detail: detail,
        payload: OutcomePayload {
            message,
            quality_level: Some(level),
            ..OutcomePayload::default()
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::Outcome;

    fn imei() -> Imei {
        Imei::parse("123456789012345").unwrap()
    }

    fn resp(status: u16, body: Option<serde_json::Value>) -> RawResponse {
        let text = body.as_ref().map(ToString::to_string).unwrap_or_default();
        RawResponse { status, body, text }
    }

    fn transport_error() -> surfbatch_api::Error {
        surfbatch_api::Error::Tls("connection reset".into())
    }

    // ── Label table ─────────────────────────────────────────────────

    #[test]
    fn label_is_case_insensitive() {
        for raw in ["activated", "Activated", "ACTIVATED"] {
            assert_eq!(billing_status_label(Some(raw)), "Activated");
        }
        assert_eq!(billing_status_label(Some("pendingactivation")), "Pending Activation");
        assert_eq!(billing_status_label(Some("Suspended")), "Suspended");
        assert_eq!(billing_status_label(Some("DEACTIVATED")), "Deactivated");
        assert_eq!(billing_status_label(Some("billingStatusNotSet")), "Not Set");
    }

    #[test]
    fn label_passes_unknown_values_through() {
        assert_eq!(billing_status_label(Some("foo")), "foo");
    }

    #[test]
    fn label_for_missing_value_is_not_set() {
        assert_eq!(billing_status_label(None), "Not Set");
        assert_eq!(billing_status_label(Some("")), "Not Set");
    }

    // ── Detail chain ────────────────────────────────────────────────

    #[test]
    fn detail_chain_priority() {
        assert_eq!(
            detail_chain(&resp(400, Some(json!({"message": "m", "error": "e"})))),
            "m"
        );
        assert_eq!(detail_chain(&resp(400, Some(json!({"error": "e"})))), "e");
        assert_eq!(detail_chain(&resp(503, None)), "HTTP 503");
    }

    // ── Validate ────────────────────────────────────────────────────

    #[test]
    fn validate_404_is_not_found() {
        let record = validate_outcome(&imei(), Ok(&resp(404, None)));
        assert_eq!(record.identifier.as_str(), "123456789012345");
        assert_eq!(record.found, Some(false));
        assert_eq!(record.http_status, 404);
        assert_eq!(record.primary_detail, "Device not found");
        assert_eq!(record.outcome(), Outcome::NotFound);
    }

    #[test]
    fn validate_success_normalizes_label_and_keeps_raw() {
        let body = json!({"data": {"billingStatus": "PENDINGACTIVATION"}});
        let record = validate_outcome(&imei(), Ok(&resp(200, Some(body))));
        assert_eq!(record.found, Some(true));
        assert!(record.ok);
        assert_eq!(record.primary_detail, "Pending Activation");
        assert_eq!(record.payload.billing_status.as_deref(), Some("Pending Activation"));
        assert_eq!(record.payload.billing_status_raw.as_deref(), Some("PENDINGACTIVATION"));
    }

    #[test]
    fn validate_success_without_status_is_not_set() {
        let record = validate_outcome(&imei(), Ok(&resp(200, Some(json!({"data": {}})))));
        assert_eq!(record.found, Some(true));
        assert_eq!(record.primary_detail, "Not Set");
        assert_eq!(record.payload.billing_status_raw.as_deref(), Some("billingStatusNotSet"));

        let unparsed = validate_outcome(&imei(), Ok(&resp(200, None)));
        assert_eq!(unparsed.found, Some(true));
        assert_eq!(unparsed.primary_detail, "Not Set");
    }

    #[test]
    fn validate_transport_failure() {
        let err = transport_error();
        let record = validate_outcome(&imei(), Err(&err));
        assert_eq!(record.found, Some(false));
        assert!(!record.ok);
        assert_eq!(record.http_status, 0);
        assert_eq!(record.primary_detail, "Server error during validation");
        assert_eq!(record.outcome(), Outcome::Failed);
    }

    #[test]
    fn validate_other_error_status_uses_detail_chain() {
        let record = validate_outcome(
            &imei(),
            Ok(&resp(403, Some(json!({"message": "forbidden device"})))),
        );
        assert_eq!(record.found, Some(false));
        assert_eq!(record.http_status, 403);
        assert_eq!(record.primary_detail, "forbidden device");
    }

    // ── Quality ─────────────────────────────────────────────────────

    #[test]
    fn quality_success_reports_display_level() {
        let level = QualityLevel::new(4).unwrap();
        let record = quality_outcome(&imei(), level, Ok(&resp(200, Some(json!({})))));
        assert!(record.ok);
        assert_eq!(record.http_status, 200);
        assert_eq!(record.primary_detail, "Level 3");
        assert_eq!(record.payload.quality_level, Some(level));
        assert_eq!(record.payload.message, None);
    }

    #[test]
    fn quality_failure_surfaces_upstream_message() {
        let level = QualityLevel::new(4).unwrap();
        let record = quality_outcome(
            &imei(),
            level,
            Ok(&resp(422, Some(json!({"error": "profile unavailable"})))),
        );
        assert!(!record.ok);
        assert_eq!(record.http_status, 422);
        assert_eq!(record.primary_detail, "profile unavailable");
        assert_eq!(record.payload.message.as_deref(), Some("profile unavailable"));
    }

    #[test]
    fn quality_transport_failure_is_500() {
        let err = transport_error();
        let level = QualityLevel::new(2).unwrap();
        let record = quality_outcome(&imei(), level, Err(&err));
        assert!(!record.ok);
        assert_eq!(record.http_status, 500);
        assert_eq!(record.primary_detail, "Server error updating quality");
    }

    // ── Billing ─────────────────────────────────────────────────────

    #[test]
    fn billing_success_echoes_target_status() {
        let record = billing_outcome(
            &imei(),
            BillingStatus::Suspended,
            Ok(&resp(200, Some(json!({})))),
        );
        assert!(record.ok);
        assert_eq!(record.found, None);
        assert_eq!(record.primary_detail, "Suspended");
        assert_eq!(record.payload.billing_status.as_deref(), Some("suspended"));
    }

    #[test]
    fn normalize_dispatches_on_operation() {
        let r = resp(404, None);
        let record = normalize(Operation::Validate, &imei(), Ok(&r));
        assert_eq!(record.primary_detail, NOT_FOUND_DETAIL);
    }
}
