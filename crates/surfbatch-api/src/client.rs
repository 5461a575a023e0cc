// Surfsight HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer auth and a uniform
// response shape. Endpoint modules (auth, devices) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Status, parsed JSON (if any) and raw text of one upstream response.
///
/// Non-2xx statuses are ordinary values: interpreting them is the caller's job.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// `None` when the body was empty or not valid JSON.
    pub body: Option<serde_json::Value>,
    pub text: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Decode the JSON body into `T`, or `None` if there is no body or it doesn't fit.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.body
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Upstream's own explanation: `message`, then `error`.
    pub fn error_detail(&self) -> Option<String> {
        self.decode::<ErrorBody>().and_then(|b| b.detail())
    }
}

/// Raw HTTP client for the Surfsight API.
///
/// Every endpoint call attaches the caller's bearer token, performs the
/// request and hands back a [`RawResponse`]. Only failures below HTTP
/// (DNS, refused connection, timeout, unreadable body) are `Err`.
#[derive(Debug, Clone)]
pub struct SurfsightClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SurfsightClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the versioned API root, e.g. `https://api-prod.surfsight.net/v2`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Perform one call and capture the response without judging its status.
    pub async fn call(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::MalformedResponse {
                    message: format!("invalid bearer token header value: {e}"),
                })?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        trace!(status, body_len = text.len(), "upstream response");

        Ok(RawResponse { status, body, text })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client(base: &str) -> SurfsightClient {
        SurfsightClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_appends_segments_under_version_prefix() {
        let c = client("https://api.example.test/v2");
        let url = c.endpoint(&["devices", "123", "billing-status"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.test/v2/devices/123/billing-status"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let c = client("https://api.example.test/v2/");
        let url = c.endpoint(&["authenticate"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/v2/authenticate");
    }

    #[test]
    fn endpoint_escapes_segments() {
        let c = client("https://api.example.test/v2");
        let url = c.endpoint(&["devices", "1/../x"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/v2/devices/1%2F..%2Fx");
    }

    #[test]
    fn raw_response_error_detail_chain() {
        let raw = RawResponse {
            status: 400,
            body: Some(json!({"error": "invalid profile"})),
            text: String::new(),
        };
        assert!(!raw.is_success());
        assert_eq!(raw.error_detail().as_deref(), Some("invalid profile"));
    }
}
