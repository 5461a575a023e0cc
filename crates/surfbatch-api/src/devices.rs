// Device endpoints
//
// Billing-status read, billing-status bulk write and data-profile write.
// Each returns the raw response; deciding what a 404 or a 400 means for
// a batch belongs to the caller.

use reqwest::Method;
use secrecy::SecretString;
use serde_json::json;

use crate::client::{RawResponse, SurfsightClient};
use crate::error::Error;

impl SurfsightClient {
    /// `GET /devices/{imei}/billing-status`
    pub async fn billing_status(
        &self,
        token: &SecretString,
        imei: &str,
    ) -> Result<RawResponse, Error> {
        let url = self.endpoint(&["devices", imei, "billing-status"])?;
        self.call(Method::GET, url, Some(token), None).await
    }

    /// `PUT /devices/billing-status/{status}` with `{ "imeis": [...] }`.
    ///
    /// One call for the whole list; upstream answers with a single status.
    pub async fn set_billing_status(
        &self,
        token: &SecretString,
        imeis: &[&str],
        status: &str,
    ) -> Result<RawResponse, Error> {
        let url = self.endpoint(&["devices", "billing-status", status])?;
        let body = json!({ "imeis": imeis });
        self.call(Method::PUT, url, Some(token), Some(&body)).await
    }

    /// `PUT /devices/{imei}/data-profile/{profile_id}` with an empty object body.
    pub async fn set_data_profile(
        &self,
        token: &SecretString,
        imei: &str,
        profile_id: u8,
    ) -> Result<RawResponse, Error> {
        let profile = profile_id.to_string();
        let url = self.endpoint(&["devices", imei, "data-profile", profile.as_str()])?;
        self.call(Method::PUT, url, Some(token), Some(&json!({}))).await
    }
}
