//! Session handling and batch orchestration between `surfbatch-api` and
//! the boundary layers (HTTP server, CLI).
//!
//! - **[`Service`]**: facade the boundary layers talk to. Logs in, resolves
//!   session ids and runs batches.
//!
//! - **[`SessionStore`]**: in-memory `DashMap` of sessions keyed by an
//!   opaque [`SessionId`]. Each holds the upstream bearer token and expires
//!   a fixed TTL (24h by default) after login.
//!
//! - **[`BatchOrchestrator`]**: applies one [`Operation`] to an ordered
//!   identifier list. Validation and quality updates run one identifier at
//!   a time and capture every failure into that identifier's record;
//!   billing updates are a single bulk call.
//!
//! - **[`normalize`]**: pure mapping from an upstream answer to an
//!   [`OutcomeRecord`], including the billing-status label table.

pub mod batch;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod service;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::BatchOrchestrator;
pub use config::{DEFAULT_SESSION_TTL, TlsVerification, UpstreamConfig};
pub use error::CoreError;
pub use service::Service;
pub use session::{AccountInfo, Session, SessionId, SessionStore};
pub use surfbatch_api::DEFAULT_BASE_URL;

pub use model::{
    BatchSummary, BillingStatus, Imei, MAX_IMEI_LEN, Operation, OperationKind, OperationRequest,
    Outcome, OutcomePayload, OutcomeRecord, QualityLevel, parse_imei_list,
};
