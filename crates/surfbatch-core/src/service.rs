// ── Service facade ──
//
// Single entry point for the boundary layers (HTTP server, CLI). Owns the
// upstream client, the session store and the orchestrator, and resolves a
// session id into credentials before any batch runs.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use surfbatch_api::SurfsightClient;

use crate::batch::BatchOrchestrator;
use crate::config::UpstreamConfig;
use crate::error::CoreError;
use crate::model::{OperationRequest, OutcomeRecord};
use crate::session::{AccountInfo, Session, SessionId, SessionStore};

/// Login, logout, status and batch execution behind one handle.
///
/// Cheap to share: wrap it in an `Arc` and hand clones to request handlers.
#[derive(Debug)]
pub struct Service {
    sessions: SessionStore,
    orchestrator: BatchOrchestrator,
}

impl Service {
    /// Build the upstream client from `config` and an empty session store.
    pub fn new(config: &UpstreamConfig) -> Result<Self, CoreError> {
        let client = SurfsightClient::new(config.base_url.clone(), &config.transport())?;
        Self::from_client(client, config)
    }

    /// Use a pre-built client (tests point this at a mock upstream).
    pub fn from_client(client: SurfsightClient, config: &UpstreamConfig) -> Result<Self, CoreError> {
        let client = Arc::new(client);
        Ok(Self {
            sessions: SessionStore::new(Arc::clone(&client), config.session_ttl)?,
            orchestrator: BatchOrchestrator::new(client),
        })
    }

    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(SessionId, Arc<Session>), CoreError> {
        self.sessions.login(email, password).await
    }

    pub fn logout(&self, id: Option<&SessionId>) -> bool {
        let removed = id.is_some_and(|id| self.sessions.logout(id));
        if removed {
            info!("session closed");
        }
        removed
    }

    pub fn status(&self, id: Option<&SessionId>) -> Result<AccountInfo, CoreError> {
        self.sessions.require_session(id).map(|s| s.account())
    }

    /// Run a batch for the session named by `id`.
    ///
    /// Fails with `Unauthenticated` before any upstream traffic when the
    /// session is missing or expired.
    pub async fn execute(
        &self,
        id: Option<&SessionId>,
        request: &OperationRequest,
    ) -> Result<Vec<OutcomeRecord>, CoreError> {
        let session = self.sessions.require_session(id)?;
        self.orchestrator.execute(&session, request).await
    }

    /// Run a batch with an explicit session (one-shot CLI use).
    pub async fn execute_with(
        &self,
        session: &Session,
        request: &OperationRequest,
    ) -> Result<Vec<OutcomeRecord>, CoreError> {
        self.orchestrator.execute(session, request).await
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
