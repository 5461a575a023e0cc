// ── Batch operation requests ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::CoreError;
use crate::model::Imei;

// ── Billing status ─────────────────────────────────────────────────

/// Upstream billing states. Serialized in upstream spelling
/// (`pendingActivation`, ...); parsed case-insensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum BillingStatus {
    PendingActivation,
    Deactivated,
    Suspended,
    /// Reached by the device itself on first connection; never set through the API.
    Activated,
}

impl BillingStatus {
    /// Whether a bulk write may target this status.
    pub fn is_settable(self) -> bool {
        !matches!(self, Self::Activated)
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::PendingActivation => "Pending Activation",
            Self::Deactivated => "Deactivated",
            Self::Suspended => "Suspended",
            Self::Activated => "Activated",
        }
    }

    /// Upstream path/body spelling.
    pub fn as_upstream(self) -> &'static str {
        self.into()
    }
}

// ── Quality level ──────────────────────────────────────────────────

/// Data-quality profile id sent upstream, constrained to `[2, 6]`.
///
/// Users see these as levels 1 through 5: the displayed level is the
/// profile id minus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct QualityLevel(u8);

impl QualityLevel {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 6;

    pub fn new(value: i64) -> Result<Self, CoreError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or_else(|| {
                CoreError::invalid_input(format!(
                    "quality level must be between {} and {} (got {value})",
                    Self::MIN,
                    Self::MAX
                ))
            })
    }

    /// The profile id sent upstream.
    pub fn profile_id(self) -> u8 {
        self.0
    }

    /// The level users see (1..=5).
    pub fn display_level(self) -> u8 {
        self.0 - 1
    }

    pub fn label(self) -> String {
        format!("Level {}", self.display_level())
    }
}

impl TryFrom<i64> for QualityLevel {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QualityLevel> for u8 {
    fn from(level: QualityLevel) -> Self {
        level.0
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Operations ─────────────────────────────────────────────────────

/// Which of the three batch operations to run, with its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Per-identifier billing-status lookup.
    Validate,
    /// One bulk call for the whole list.
    SetBillingStatus(BillingStatus),
    /// One call per identifier.
    SetQualityLevel(QualityLevel),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Validate => OperationKind::Validate,
            Self::SetBillingStatus(_) => OperationKind::Billing,
            Self::SetQualityLevel(_) => OperationKind::Quality,
        }
    }
}

/// Parameter-free operation tag for logs and result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    Validate,
    Billing,
    Quality,
}

/// One batch: an operation applied to an ordered, non-empty identifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub identifiers: Vec<Imei>,
}

impl OperationRequest {
    /// Build and check a request. Fails before any upstream call is made.
    pub fn new(operation: Operation, identifiers: Vec<Imei>) -> Result<Self, CoreError> {
        let request = Self {
            operation,
            identifiers,
        };
        request.check()?;
        Ok(request)
    }

    pub fn validate(identifiers: Vec<Imei>) -> Result<Self, CoreError> {
        Self::new(Operation::Validate, identifiers)
    }

    pub fn set_billing_status(
        identifiers: Vec<Imei>,
        status: BillingStatus,
    ) -> Result<Self, CoreError> {
        Self::new(Operation::SetBillingStatus(status), identifiers)
    }

    pub fn set_quality_level(
        identifiers: Vec<Imei>,
        level: QualityLevel,
    ) -> Result<Self, CoreError> {
        Self::new(Operation::SetQualityLevel(level), identifiers)
    }

    pub(crate) fn check(&self) -> Result<(), CoreError> {
        if self.identifiers.is_empty() {
            return Err(CoreError::invalid_input("IMEI list is required"));
        }
        if let Operation::SetBillingStatus(status) = self.operation {
            if !status.is_settable() {
                return Err(CoreError::invalid_input(format!(
                    "billing status '{status}' cannot be set explicitly"
                )));
            }
        }
        Ok(())
    }
}
