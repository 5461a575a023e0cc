//! Configuration for the surfbatch server and CLI.
//!
//! TOML file, `SURFBATCH_*` environment overrides, password resolution
//! (env + keyring + plaintext) and translation to
//! `surfbatch_core::UpstreamConfig`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use surfbatch_core::{TlsVerification, UpstreamConfig};

/// Environment variable holding the upstream password.
pub const PASSWORD_ENV: &str = "SURFBATCH_PASSWORD";

/// Keyring service name; entries are keyed by account email.
pub const KEYRING_SERVICE: &str = "surfbatch";

/// Longest accepted session lifetime: one year.
pub const MAX_TTL_HOURS: u64 = 24 * 365;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for '{email}'")]
    NoCredentials { email: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by `serve` and the batch commands.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub upstream: UpstreamSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub account: AccountSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Address the HTTP surface binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Mark the session cookie `Secure` (serve behind TLS).
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpstreamSettings {
    /// Versioned API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip TLS verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

/// Credentials for one-shot CLI batches.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AccountSettings {
    pub email: Option<String>,

    /// Plaintext password. Prefer the keyring or `SURFBATCH_PASSWORD`.
    pub password: Option<String>,
}

fn default_listen() -> String {
    "127.0.0.1:3000".into()
}
fn default_base_url() -> String {
    surfbatch_core::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_ttl_hours() -> u64 {
    24
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "surfbatch", "surfbatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("surfbatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, then apply `SURFBATCH_*` overrides.
///
/// Nested keys use a double underscore: `SURFBATCH_UPSTREAM__BASE_URL`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SURFBATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the upstream password for `email` without prompting.
///
/// Order: `SURFBATCH_PASSWORD`, system keyring, plaintext in config.
pub fn resolve_password(cfg: &Config, email: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(SecretString::from(pw));
        }
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, email) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = cfg.account.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        email: email.into(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse the configured listen address.
pub fn listen_addr(cfg: &Config) -> Result<SocketAddr, ConfigError> {
    cfg.server
        .listen
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server.listen".into(),
            reason: format!("invalid socket address: {}", cfg.server.listen),
        })
}

/// Build an `UpstreamConfig` from the file settings.
pub fn to_upstream_config(cfg: &Config) -> Result<UpstreamConfig, ConfigError> {
    let base_url: url::Url = cfg
        .upstream
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "upstream.base_url".into(),
            reason: format!("invalid URL: {}", cfg.upstream.base_url),
        })?;

    if !(1..=MAX_TTL_HOURS).contains(&cfg.session.ttl_hours) {
        return Err(ConfigError::Validation {
            field: "session.ttl_hours".into(),
            reason: format!("must be between 1 and {MAX_TTL_HOURS}"),
        });
    }

    let tls = if cfg.upstream.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.upstream.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut upstream = UpstreamConfig::new(base_url);
    upstream.tls = tls;
    upstream.timeout = Duration::from_secs(cfg.upstream.timeout);
    upstream.session_ttl = Duration::from_secs(cfg.session.ttl_hours.saturating_mul(60 * 60));
    Ok(upstream)
}
