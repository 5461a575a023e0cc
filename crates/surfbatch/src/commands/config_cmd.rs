//! Config subcommand handlers.

use std::fmt::Write as _;

use secrecy::ExposeSecret;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[server]");
    let _ = writeln!(out, "listen = \"{}\"", cfg.server.listen);
    let _ = writeln!(out, "secure_cookies = {}", cfg.server.secure_cookies);

    let _ = writeln!(out);
    let _ = writeln!(out, "[upstream]");
    let _ = writeln!(out, "base_url = \"{}\"", cfg.upstream.base_url);
    let _ = writeln!(out, "timeout = {}", cfg.upstream.timeout);
    let _ = writeln!(out, "insecure = {}", cfg.upstream.insecure);
    if let Some(ref ca) = cfg.upstream.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "[session]");
    let _ = writeln!(out, "ttl_hours = {}", cfg.session.ttl_hours);

    let _ = writeln!(out);
    let _ = writeln!(out, "[account]");
    if let Some(ref email) = cfg.account.email {
        let _ = writeln!(out, "email = \"{email}\"");
    }
    if cfg.account.password.is_some() {
        let _ = writeln!(out, "password = \"****\"");
    }

    out
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::effective_path(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let email = config::email(&cfg, global)?;
            let password = config::prompt_password(&email)?;

            let entry = keyring::Entry::new(surfbatch_config::KEYRING_SERVICE, &email)?;
            entry.set_password(password.expose_secret())?;
            output::print_output(&format!("Password stored for {email}."), global.quiet);
            Ok(())
        }
    }
}
