// ── Batch orchestration ──
//
// Runs one operation over an identifier list on behalf of a session.
// Per-identifier operations (validate, quality) go strictly in input
// order, one upstream call at a time, and never abort early: every
// failure is captured into that identifier's record. Billing is a single
// bulk call whose one answer applies to the whole list.

use std::sync::Arc;

use tracing::{debug, info, warn};

use surfbatch_api::SurfsightClient;

use crate::error::CoreError;
use crate::model::{
    BillingStatus, Imei, Operation, OperationRequest, OutcomeRecord, QualityLevel,
};
use crate::normalize;
use crate::session::Session;

/// Drives upstream calls for one batch and folds the answers into records.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    client: Arc<SurfsightClient>,
}

impl BatchOrchestrator {
    pub fn new(client: Arc<SurfsightClient>) -> Self {
        Self { client }
    }

    /// Execute `request` with the session's token.
    ///
    /// Returns one record per input identifier, in input order. The only
    /// `Err` outcomes are a malformed request (checked before any call)
    /// and a failed bulk billing write.
    pub async fn execute(
        &self,
        session: &Session,
        request: &OperationRequest,
    ) -> Result<Vec<OutcomeRecord>, CoreError> {
        request.check()?;

        let kind = request.operation.kind();
        debug!(
            operation = %kind,
            count = request.identifiers.len(),
            "batch starting"
        );

        let records = match request.operation {
            Operation::Validate => self.validate(session, &request.identifiers).await,
            Operation::SetBillingStatus(status) => {
                self.set_billing_status(session, &request.identifiers, status)
                    .await?
            }
            Operation::SetQualityLevel(level) => {
                self.set_quality_level(session, &request.identifiers, level)
                    .await
            }
        };

        let failed = records.iter().filter(|r| !r.ok).count();
        info!(
            operation = %kind,
            total = records.len(),
            failed,
            "batch finished"
        );
        Ok(records)
    }

    async fn validate(&self, session: &Session, imeis: &[Imei]) -> Vec<OutcomeRecord> {
        let mut records = Vec::with_capacity(imeis.len());
        for imei in imeis {
            let result = self
                .client
                .billing_status(session.token(), imei.as_str())
                .await;
            match result {
                Err(ref e) => {
                    warn!(operation = "validate", imei = %imei, error = %e, "upstream call failed");
                }
                Ok(ref resp) if !resp.is_success() && !resp.is_not_found() => {
                    warn!(
                        operation = "validate",
                        imei = %imei,
                        status = resp.status,
                        detail = %normalize::detail_chain(resp),
                        "upstream call rejected"
                    );
                }
                Ok(_) => {}
            }
            records.push(normalize::validate_outcome(imei, result.as_ref()));
        }
        records
    }

    async fn set_quality_level(
        &self,
        session: &Session,
        imeis: &[Imei],
        level: QualityLevel,
    ) -> Vec<OutcomeRecord> {
        let mut records = Vec::with_capacity(imeis.len());
        for imei in imeis {
            let result = self
                .client
                .set_data_profile(session.token(), imei.as_str(), level.profile_id())
                .await;
            match result {
                Err(ref e) => {
                    warn!(operation = "quality", imei = %imei, error = %e, "upstream call failed");
                }
                Ok(ref resp) if !resp.is_success() => {
                    warn!(
                        operation = "quality",
                        imei = %imei,
                        status = resp.status,
                        detail = %normalize::detail_chain(resp),
                        "upstream call rejected"
                    );
                }
                Ok(_) => {}
            }
            records.push(normalize::quality_outcome(imei, level, result.as_ref()));
        }
        records
    }

    async fn set_billing_status(
        &self,
        session: &Session,
        imeis: &[Imei],
        status: BillingStatus,
    ) -> Result<Vec<OutcomeRecord>, CoreError> {
        let raw: Vec<&str> = imeis.iter().map(Imei::as_str).collect();
        let resp = self
            .client
            .set_billing_status(session.token(), &raw, status.as_upstream())
            .await
            .inspect_err(|e| {
                warn!(operation = "billing", count = raw.len(), error = %e, "bulk call failed");
            })?;

        if !resp.is_success() {
            let message = resp
                .error_detail()
                .unwrap_or_else(|| format!("Upstream error ({})", resp.status));
            warn!(
                operation = "billing",
                status = resp.status,
                %message,
                "bulk call rejected"
            );
            return Err(CoreError::UpstreamRejected {
                status: resp.status,
                message,
            });
        }

        Ok(imeis
            .iter()
            .map(|imei| normalize::billing_outcome(imei, status, Ok(&resp)))
            .collect())
    }
}
