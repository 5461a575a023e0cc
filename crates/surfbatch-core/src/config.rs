// ── Runtime upstream configuration ──
//
// Describes *how* to reach the Surfsight API and how long sessions live.
// Never touches disk: `surfbatch-config` builds one of these and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use surfbatch_api::{TlsMode, TransportConfig};

/// Default session lifetime: 24 hours from login.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (staging endpoints with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to the upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Versioned API root (e.g., `https://api-prod.surfsight.net/v2`).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-call timeout.
    pub timeout: Duration,
    /// How long a session stays valid after login.
    pub session_ttl: Duration,
}

impl UpstreamConfig {
    /// Config with defaults for everything but the base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
