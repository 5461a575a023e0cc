//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders batch results in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits one tab-separated
//! line per IMEI.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use surfbatch_core::{BatchSummary, Outcome, OutcomeRecord};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn outcome_label(outcome: Outcome, color: bool) -> String {
    let label = match outcome {
        Outcome::Ok => "ok",
        Outcome::NotFound => "not found",
        Outcome::Failed => "failed",
    };
    if !color {
        return label.to_owned();
    }
    match outcome {
        Outcome::Ok => label.green().to_string(),
        Outcome::NotFound => label.yellow().to_string(),
        Outcome::Failed => label.red().to_string(),
    }
}

// ── Result rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "IMEI")]
    imei: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "HTTP")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn to_row(record: &OutcomeRecord, color: bool) -> OutcomeRow {
    OutcomeRow {
        imei: record.identifier.to_string(),
        result: outcome_label(record.outcome(), color),
        status: match record.http_status {
            0 => "-".into(),
            s => s.to_string(),
        },
        detail: record.primary_detail.clone(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a batch's records in the chosen format.
pub fn render_results(
    format: OutputFormat,
    records: &[OutcomeRecord],
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<OutcomeRow> = records.iter().map(|r| to_row(r, color)).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(records, false),
        OutputFormat::JsonCompact => render_json(records, true),
        OutputFormat::Yaml => render_yaml(records),
        OutputFormat::Plain => Ok(records
            .iter()
            .map(|r| format!("{}\t{}", r.identifier, r.primary_detail))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// One-line tally for stderr.
pub fn render_summary(summary: &BatchSummary) -> String {
    format!(
        "{} device(s): {} ok, {} not found, {} failed",
        summary.total, summary.succeeded, summary.not_found, summary.failed
    )
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json<T: serde::Serialize + ?Sized>(
    data: &T,
    compact: bool,
) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use surfbatch_core::{Imei, OutcomePayload};

    use super::*;

    fn records() -> Vec<OutcomeRecord> {
        vec![
            OutcomeRecord {
                identifier: Imei::parse("111").unwrap(),
                found: Some(true),
                ok: true,
                http_status: 200,
                primary_detail: "Activated".into(),
                payload: OutcomePayload::default(),
            },
            OutcomeRecord {
                identifier: Imei::parse("222").unwrap(),
                found: Some(false),
                ok: false,
                http_status: 0,
                primary_detail: "Server error during validation".into(),
                payload: OutcomePayload::default(),
            },
        ]
    }

    #[test]
    fn table_has_one_row_per_record() {
        let out = render_results(OutputFormat::Table, &records(), false).unwrap();
        assert!(out.contains("IMEI"));
        assert!(out.contains("111"));
        assert!(out.contains("failed"));
        // Transport failures have no HTTP status to show.
        assert!(out.contains(" - "));
    }

    #[test]
    fn plain_is_tab_separated() {
        let out = render_results(OutputFormat::Plain, &records(), false).unwrap();
        assert_eq!(out, "111\tActivated\n222\tServer error during validation");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_results(OutputFormat::JsonCompact, &records(), false).unwrap();
        assert!(!out.contains('\n'));
        assert!(out.starts_with(r#"[{"imei":"111""#));
    }

    #[test]
    fn summary_line() {
        let summary = BatchSummary::from_records(&records());
        assert_eq!(
            render_summary(&summary),
            "2 device(s): 1 ok, 0 not found, 1 failed"
        );
    }
}
