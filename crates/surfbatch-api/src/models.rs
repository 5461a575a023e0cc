// Per-endpoint response shapes.
//
// Surfsight is inconsistent about where it puts things: payloads usually
// sit under `data`, error text may be `message` or `error`, and bodies are
// sometimes empty. Each endpoint gets one lenient type here so callers
// never poke at untyped JSON.

use serde::{Deserialize, Deserializer};

/// The `{ "data": ... }` wrapper most Surfsight responses use.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

/// Payload of `POST /authenticate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub organization_id: Option<String>,
}

/// Payload of `GET /devices/{imei}/billing-status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingStatusData {
    #[serde(default)]
    pub billing_status: Option<String>,
}

/// Error fields Surfsight puts at the top level of a response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    /// First non-empty of `message`, then `error`.
    ///
    /// `error` may be a bare string or a nested object; objects are
    /// rendered as compact JSON.
    pub fn detail(&self) -> Option<String> {
        if let Some(msg) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return Some(msg.to_owned());
        }
        match self.error.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Organization ids come back as numbers on some accounts and strings on others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn auth_data_accepts_numeric_organization_id() {
        let env: Envelope<AuthData> =
            serde_json::from_value(json!({"data": {"token": "t", "organizationId": 42}})).unwrap();
        let data = env.data.unwrap();
        assert_eq!(data.token.as_deref(), Some("t"));
        assert_eq!(data.organization_id.as_deref(), Some("42"));
    }

    #[test]
    fn envelope_without_data_is_none() {
        let env: Envelope<BillingStatusData> = serde_json::from_value(json!({})).unwrap();
        assert!(env.data.is_none());
    }

    #[test]
    fn error_body_prefers_message_over_error() {
        let body: ErrorBody =
            serde_json::from_value(json!({"message": "bad imei", "error": "E1"})).unwrap();
        assert_eq!(body.detail().as_deref(), Some("bad imei"));
    }

    #[test]
    fn error_body_falls_back_to_error_field() {
        let body: ErrorBody = serde_json::from_value(json!({"message": "", "error": "E1"})).unwrap();
        assert_eq!(body.detail().as_deref(), Some("E1"));

        let nested: ErrorBody =
            serde_json::from_value(json!({"error": {"code": 7}})).unwrap();
        assert_eq!(nested.detail().as_deref(), Some(r#"{"code":7}"#));
    }

    #[test]
    fn error_body_without_fields_has_no_detail() {
        let body = ErrorBody::default();
        assert!(body.detail().is_none());
    }
}
