//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use surfbatch_config::ConfigError;
use surfbatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UPSTREAM: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Surfsight API: {message}")]
    #[diagnostic(
        code(surfbatch::connection_failed),
        help(
            "Check network access to the API root.\n\
             Override it with --base-url or [upstream] base_url in the config file."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(surfbatch::auth_failed),
        help(
            "{message}\n\
             Verify the email and password.\n\
             Run: surfbatch config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No account email configured")]
    #[diagnostic(
        code(surfbatch::no_email),
        help(
            "Pass --email, set SURFBATCH_EMAIL, or add [account] email to\n\
             {path}"
        )
    )]
    NoEmail { path: String },

    #[error("No password available for '{email}'")]
    #[diagnostic(
        code(surfbatch::no_credentials),
        help(
            "Set SURFBATCH_PASSWORD, run: surfbatch config set-password,\n\
             or run interactively to be prompted."
        )
    )]
    NoCredentials { email: String },

    // ── Upstream ─────────────────────────────────────────────────────
    #[error("Surfsight rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(surfbatch::upstream_rejected))]
    UpstreamRejected { status: u16, message: String },

    #[error("Unexpected response from Surfsight: {message}")]
    #[diagnostic(code(surfbatch::upstream_malformed))]
    UpstreamMalformed { message: String },

    #[error("Device '{identifier}' not found")]
    #[diagnostic(code(surfbatch::not_found))]
    NotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(surfbatch::validation))]
    Validation { field: String, reason: String },

    #[error("No IMEIs given")]
    #[diagnostic(
        code(surfbatch::no_input),
        help("Pass IMEIs as arguments or use --file (- for stdin).")
    )]
    NoInput,

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(surfbatch::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Write operation '{action}' requires confirmation")]
    #[diagnostic(
        code(surfbatch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(surfbatch::server))]
    Server(#[from] surfbatch_server::ServerError),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(surfbatch::keyring))]
    Keyring(#[from] keyring::Error),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoEmail { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::UpstreamRejected { .. } | Self::UpstreamMalformed { .. } => exit_code::UPSTREAM,
            Self::Validation { .. } | Self::NoInput | Self::NonInteractiveRequiresYes { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredentials { message } => CliError::AuthFailed { message },

            CoreError::Unauthenticated => CliError::AuthFailed {
                message: "Session is missing or expired.".into(),
            },

            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::UpstreamMalformed { message } => CliError::UpstreamMalformed { message },

            CoreError::UpstreamRejected { status, message } => {
                CliError::UpstreamRejected { status, message }
            }

            CoreError::TransportFailure { message } => CliError::ConnectionFailed { message },

            CoreError::NotFound { identifier } => CliError::NotFound { identifier },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_class() {
        let cases = [
            (
                CoreError::InvalidCredentials {
                    message: "x".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::InvalidInput {
                    message: "x".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::UpstreamRejected {
                    status: 500,
                    message: "x".into(),
                },
                exit_code::UPSTREAM,
            ),
            (
                CoreError::TransportFailure {
                    message: "x".into(),
                },
                exit_code::CONNECTION,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }
}
