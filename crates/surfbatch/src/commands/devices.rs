//! Batch handlers: validate, billing, quality.
//!
//! Each run logs in once, executes one batch and renders its records.
//! Requests are built and checked before any network traffic.

use surfbatch_core::{
    BatchSummary, BillingStatus, OperationRequest, OutcomeRecord, QualityLevel, Service,
};
use tracing::debug;

use crate::cli::{BatchInput, BillingArgs, GlobalOpts, QualityArgs};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn validate(input: &BatchInput, global: &GlobalOpts) -> Result<(), CliError> {
    let request = OperationRequest::validate(util::read_identifiers(input)?)?;
    let records = run(&request, global).await?;
    report(&records, global)
}

pub async fn billing(args: &BillingArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let status = BillingStatus::from(args.status);
    let request =
        OperationRequest::set_billing_status(util::read_identifiers(&args.input)?, status)?;

    let prompt = format!(
        "Set billing status of {} device(s) to {}?",
        request.identifiers.len(),
        status.label()
    );
    if !util::confirm(&prompt, "billing", global.yes)? {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let records = run(&request, global).await?;
    report(&records, global)
}

pub async fn quality(args: &QualityArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let level = QualityLevel::new(args.level)?;
    let request =
        OperationRequest::set_quality_level(util::read_identifiers(&args.input)?, level)?;

    let prompt = format!(
        "Set data quality of {} device(s) to {}?",
        request.identifiers.len(),
        level.label()
    );
    if !util::confirm(&prompt, "quality", global.yes)? {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let records = run(&request, global).await?;
    report(&records, global)
}

/// Log in with the configured account and execute one batch.
async fn run(request: &OperationRequest, global: &GlobalOpts) -> Result<Vec<OutcomeRecord>, CliError> {
    let cfg = config::load(global)?;
    let upstream = config::upstream(&cfg, global)?;
    let email = config::email(&cfg, global)?;
    let password = config::password(&cfg, &email)?;

    let service = Service::new(&upstream)?;
    let (_, session) = service.login(&email, &password).await?;
    debug!(
        operation = %request.operation.kind(),
        count = request.identifiers.len(),
        "running batch"
    );
    Ok(service.execute_with(&session, request).await?)
}

fn report(records: &[OutcomeRecord], global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let rendered = output::render_results(global.output, records, color)?;
    output::print_output(&rendered, global.quiet);

    if !global.quiet {
        eprintln!("{}", output::render_summary(&BatchSummary::from_records(records)));
    }
    Ok(())
}
