//! CLI configuration: thin wrapper around `surfbatch_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --base-url, --email, --insecure) and the interactive
//! password prompt.

use std::io::IsTerminal;
use std::path::PathBuf;

use secrecy::SecretString;

use surfbatch_core::{TlsVerification, UpstreamConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use surfbatch_config::{Config, config_path};

/// The config file this invocation reads.
pub fn effective_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load config from `--config` or the platform path.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(surfbatch_config::load_config_from(&effective_path(global))?)
}

/// Translate config + global flags into an `UpstreamConfig`.
///
/// CLI flag overrides take priority over file values.
pub fn upstream(cfg: &Config, global: &GlobalOpts) -> Result<UpstreamConfig, CliError> {
    let mut upstream = surfbatch_config::to_upstream_config(cfg)?;

    if let Some(ref raw) = global.base_url {
        upstream.base_url = raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    if global.insecure {
        upstream.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(upstream)
}

/// Account email: flag/env, then config.
pub fn email(cfg: &Config, global: &GlobalOpts) -> Result<String, CliError> {
    global
        .email
        .clone()
        .or_else(|| cfg.account.email.clone())
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| CliError::NoEmail {
            path: effective_path(global).display().to_string(),
        })
}

/// Password from env/keyring/config, else an interactive prompt.
pub fn password(cfg: &Config, email: &str) -> Result<SecretString, CliError> {
    if let Ok(pw) = surfbatch_config::resolve_password(cfg, email) {
        return Ok(pw);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoCredentials {
            email: email.into(),
        });
    }
    prompt_password(email)
}

pub fn prompt_password(email: &str) -> Result<SecretString, CliError> {
    let pw = rpassword::prompt_password(format!("Password for {email}: "))?;
    if pw.is_empty() {
        return Err(CliError::NoCredentials {
            email: email.into(),
        });
    }
    Ok(SecretString::from(pw))
}
