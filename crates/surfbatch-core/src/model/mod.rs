// ── Domain model ──
//
// Identifiers, operation requests and per-identifier outcome records.
// These are the only shapes that cross from the orchestrator into the
// boundary layer.

pub mod imei;
pub mod operation;
pub mod outcome;

pub use imei::{Imei, MAX_IMEI_LEN, parse_imei_list};
pub use operation::{BillingStatus, Operation, OperationKind, OperationRequest, QualityLevel};
pub use outcome::{BatchSummary, Outcome, OutcomePayload, OutcomeRecord};
