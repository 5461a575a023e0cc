// Login exchange
//
// `POST /authenticate` trades an email/password pair for a bearer token.
// The token is handed to the caller as a `SecretString` and is never
// logged here.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::SurfsightClient;
use crate::error::Error;
use crate::models::{AuthData, Envelope};

/// Credentials established by a successful login exchange.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: SecretString,
    pub organization_id: Option<String>,
}

impl SurfsightClient {
    /// Authenticate with the upstream API using email/password.
    ///
    /// A non-2xx answer is [`Error::Authentication`]; a 2xx answer without
    /// `data.token` is [`Error::MalformedResponse`].
    pub async fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthGrant, Error> {
        let url = self.endpoint(&["authenticate"])?;
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        debug!(email, "authenticating");

        let resp = self.call(Method::POST, url, None, Some(&body)).await?;

        if !resp.is_success() {
            let detail = resp
                .error_detail()
                .unwrap_or_else(|| format!("HTTP {}", resp.status));
            return Err(Error::Authentication {
                message: format!("login rejected (HTTP {}): {detail}", resp.status),
            });
        }

        let data = resp
            .decode::<Envelope<AuthData>>()
            .and_then(|env| env.data)
            .unwrap_or_default();

        let token = data
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::MalformedResponse {
                message: "authenticate response carried no token".into(),
            })?;

        debug!(email, "login successful");
        Ok(AuthGrant {
            token: SecretString::from(token),
            organization_id: data.organization_id,
        })
    }
}
