//! Clap derive structures for the `surfbatch` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use surfbatch_core::BillingStatus;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// surfbatch -- bulk billing and data-quality operations for Surfsight devices
#[derive(Debug, Parser)]
#[command(
    name = "surfbatch",
    version,
    about = "Run batch operations on Surfsight devices by IMEI",
    long_about = "Validate, bill and tune Surfsight devices in bulk.\n\n\
        Run a single batch from the terminal, or `serve` the HTTP API\n\
        that browser clients log in to.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SURFBATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Upstream API root (overrides config)
    #[arg(long, env = "SURFBATCH_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Account email (overrides config)
    #[arg(long, short = 'e', env = "SURFBATCH_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SURFBATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid upstream TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Tab-separated IMEI and detail, one per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),

    /// Look up the billing status of each device
    #[command(alias = "v")]
    Validate(BatchInput),

    /// Set the billing status of all listed devices in one call
    #[command(alias = "b")]
    Billing(BillingArgs),

    /// Set the data-quality level of each device
    #[command(alias = "qa")]
    Quality(QualityArgs),

    /// Inspect configuration and stored credentials
    Config(ConfigArgs),
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long, short = 'l')]
    pub listen: Option<String>,

    /// Mark the session cookie Secure
    #[arg(long)]
    pub secure_cookies: bool,
}

// ── Batches ──────────────────────────────────────────────────────────

/// Where the IMEI list comes from.
#[derive(Debug, Args)]
pub struct BatchInput {
    /// IMEIs (commas or whitespace separate entries)
    pub imeis: Vec<String>,

    /// Read IMEIs from a file (`-` for stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BillingArgs {
    #[command(flatten)]
    pub input: BatchInput,

    /// Target billing status
    #[arg(long, short = 's')]
    pub status: BillingStatusArg,
}

#[derive(Debug, Args)]
pub struct QualityArgs {
    #[command(flatten)]
    pub input: BatchInput,

    /// Data profile id (2-6; shown to users as levels 1-5)
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub level: i64,
}

/// Billing states that may be set explicitly.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BillingStatusArg {
    #[value(alias = "pendingActivation")]
    PendingActivation,
    Deactivated,
    Suspended,
}

impl From<BillingStatusArg> for BillingStatus {
    fn from(arg: BillingStatusArg) -> Self {
        match arg {
            BillingStatusArg::PendingActivation => Self::PendingActivation,
            BillingStatusArg::Deactivated => Self::Deactivated,
            BillingStatusArg::Suspended => Self::Suspended,
        }
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration (secrets masked)
    Show,

    /// Store the account password in the system keyring
    SetPassword,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
