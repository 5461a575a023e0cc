use thiserror::Error;

/// Top-level error type for the `surfbatch-api` crate.
///
/// Non-2xx responses are *not* errors here: endpoint calls hand back a
/// [`RawResponse`](crate::RawResponse) for the caller to interpret. The
/// variants below cover the login exchange and the transport itself.
/// `surfbatch-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The authenticate endpoint rejected the credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A success response was missing a field the caller depends on.
    #[error("Malformed upstream response: {message}")]
    MalformedResponse { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Returns `true` if the failure happened below HTTP (no status was received).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Tls(_))
    }
}
