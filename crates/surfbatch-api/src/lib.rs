// surfbatch-api: Async Rust client for the Surfsight device-management API.
//
// Knows how to reach the upstream endpoints and nothing about batching:
// every call returns a raw status/body pair and only transport failures
// surface as errors.

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::AuthGrant;
pub use client::{RawResponse, SurfsightClient};
pub use error::Error;
pub use models::{AuthData, BillingStatusData, Envelope, ErrorBody};
pub use transport::{TlsMode, TransportConfig};

/// Production base URL of the Surfsight v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api-prod.surfsight.net/v2";
