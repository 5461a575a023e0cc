// ── Session store ──
//
// Exchanges credentials for an upstream token once, then hands the token
// back to callers presenting the session id. Sessions expire a fixed TTL
// after login and are never refreshed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use surfbatch_api::SurfsightClient;

use crate::error::CoreError;

// ── Session id ─────────────────────────────────────────────────────

/// Opaque handle the boundary layer stores in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

// ── Session ────────────────────────────────────────────────────────

/// Credentials established by one login.
#[derive(Debug)]
pub struct Session {
    pub email: String,
    token: SecretString,
    pub organization_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        email: String,
        token: SecretString,
        organization_id: Option<String>,
        created_at: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            email,
            token,
            organization_id,
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Bearer token for upstream calls.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn account(&self) -> AccountInfo {
        AccountInfo {
            email: self.email.clone(),
            organization_id: self.organization_id.clone(),
        }
    }
}

/// What a caller may learn about its own session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub email: String,
    pub organization_id: Option<String>,
}

// ── Store ──────────────────────────────────────────────────────────

/// In-memory map of live sessions.
///
/// Reads and writes from concurrent requests go through a `DashMap`.
/// Expired entries are rejected on lookup and dropped lazily.
#[derive(Debug)]
pub struct SessionStore {
    client: Arc<SurfsightClient>,
    sessions: DashMap<SessionId, Arc<Session>>,
    ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(client: Arc<SurfsightClient>, ttl: Duration) -> Result<Self, CoreError> {
        let ttl = TimeDelta::from_std(ttl).map_err(|e| CoreError::Config {
            message: format!("session TTL out of range: {e}"),
        })?;
        Ok(Self {
            client,
            sessions: DashMap::new(),
            ttl,
        })
    }

    /// Authenticate upstream and open a session.
    ///
    /// Any existing session the caller held is left to expire; a new
    /// id is always issued.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(SessionId, Arc<Session>), CoreError> {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(CoreError::invalid_input("Email and password required"));
        }

        let grant = self.client.authenticate(email, password).await?;
        let session = Session::new(
            email.to_owned(),
            grant.token,
            grant.organization_id,
            Utc::now(),
            self.ttl,
        );
        let (id, session) = self.adopt(session);
        info!(
            email = %session.email,
            organization_id = session.organization_id.as_deref().unwrap_or("-"),
            "session opened"
        );
        Ok((id, session))
    }

    /// Register an already-built session under a fresh id.
    pub fn adopt(&self, session: Session) -> (SessionId, Arc<Session>) {
        let id = SessionId::new();
        let session = Arc::new(session);
        self.sessions.insert(id, Arc::clone(&session));
        (id, session)
    }

    /// Look up a live session, failing with `Unauthenticated` otherwise.
    pub fn require_session(&self, id: Option<&SessionId>) -> Result<Arc<Session>, CoreError> {
        self.require_session_at(id, Utc::now())
    }

    pub fn require_session_at(
        &self,
        id: Option<&SessionId>,
        now: DateTime<Utc>,
    ) -> Result<Arc<Session>, CoreError> {
        let id = id.ok_or(CoreError::Unauthenticated)?;
        let session = self
            .sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(CoreError::Unauthenticated)?;

        if session.is_expired_at(now) {
            debug!(%id, "session expired");
            self.sessions.remove(id);
            return Err(CoreError::Unauthenticated);
        }
        Ok(session)
    }

    /// Drop a session. Returns whether one existed.
    pub fn logout(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drop every expired session, returning how many went.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}
