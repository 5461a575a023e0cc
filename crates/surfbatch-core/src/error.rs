// ── Core error types ──
//
// Batch-level failures. Per-identifier failures during validation and
// quality updates never reach this type: they are folded into
// `OutcomeRecord`s. The `From<surfbatch_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    #[error("Not authenticated")]
    Unauthenticated,

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("Upstream response was malformed: {message}")]
    UpstreamMalformed { message: String },

    #[error("Upstream rejected the request (HTTP {status}): {message}")]
    UpstreamRejected { status: u16, message: String },

    #[error("Could not reach upstream: {message}")]
    TransportFailure { message: String },

    /// Per-identifier 404. Recorded in results during validation, never
    /// raised for a whole batch.
    #[error("Device not found: {identifier}")]
    NotFound { identifier: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<surfbatch_api::Error> for CoreError {
    fn from(err: surfbatch_api::Error) -> Self {
        match err {
            surfbatch_api::Error::Authentication { message } => {
                CoreError::InvalidCredentials { message }
            }
            surfbatch_api::Error::MalformedResponse { message } => {
                CoreError::UpstreamMalformed { message }
            }
            surfbatch_api::Error::Transport(e) => CoreError::TransportFailure {
                message: e.to_string(),
            },
            surfbatch_api::Error::Tls(msg) => CoreError::TransportFailure {
                message: format!("TLS error: {msg}"),
            },
            surfbatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_maps_to_invalid_credentials() {
        let err: CoreError = surfbatch_api::Error::Authentication {
            message: "nope".into(),
        }
        .into();
        assert!(matches!(err, CoreError::InvalidCredentials { ref message } if message == "nope"));
    }

    #[test]
    fn missing_token_maps_to_upstream_malformed() {
        let err: CoreError = surfbatch_api::Error::MalformedResponse {
            message: "no token".into(),
        }
        .into();
        assert!(matches!(err, CoreError::UpstreamMalformed { .. }));
    }

    #[test]
    fn tls_maps_to_transport_failure() {
        let err: CoreError = surfbatch_api::Error::Tls("handshake".into()).into();
        assert_eq!(
            err.to_string(),
            "Could not reach upstream: TLS error: handshake"
        );
    }
}
