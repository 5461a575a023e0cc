//! HTTP surface for surfbatch.
//!
//! Cookie-based login against the upstream API and three batch endpoints
//! (`validate`, `billing`, `quality`) that run through
//! [`surfbatch_core::Service`]. Every error leaves as `{ "error": ... }`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{Instrument, debug, info};

use surfbatch_core::Service;

pub mod cookie;
pub mod error;
mod handlers;

pub use cookie::{SESSION_COOKIE, SessionCookie};
pub use error::ApiError;

/// How often expired sessions are swept from the store.
const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

// ── State ───────────────────────────────────────────────────────────

/// Knobs that affect responses rather than upstream calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterOptions {
    /// Add `Secure` to the session cookie.
    pub secure_cookies: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<Service>,
    pub options: RouterOptions,
}

impl AppState {
    /// Cookie lifetime matches the session TTL.
    pub(crate) fn cookie_max_age(&self) -> i64 {
        self.service.sessions().ttl().num_seconds()
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(service: Arc<Service>, options: RouterOptions) -> Router {
    let state = AppState { service, options };

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/status", get(handlers::auth::status))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/devices/validate", post(handlers::devices::validate))
        .route("/api/devices/billing", post(handlers::devices::billing))
        .route("/api/devices/quality", post(handlers::devices::quality))
        .layer(middleware::from_fn(request_tracing))
        .with_state(state)
}

async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, route = %route);

    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    span.in_scope(|| {
        debug!(
            status = response.status().as_u16(),
            latency_ms,
            "request finished"
        );
    });
    response
}

// ── Serving ─────────────────────────────────────────────────────────

/// Bind `addr` and serve until Ctrl-C.
///
/// A background task sweeps expired sessions while the server runs.
pub async fn serve(
    addr: SocketAddr,
    service: Arc<Service>,
    options: RouterOptions,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr()?;
    info!(addr = %local, "listening");

    let sweeper = tokio::spawn(purge_loop(Arc::clone(&service)));
    let app = router(service, options);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    sweeper.abort();
    info!("server stopped");
    result.map_err(ServerError::from)
}

async fn purge_loop(service: Arc<Service>) {
    let mut ticker = tokio::time::interval(PURGE_INTERVAL);
    loop {
        ticker.tick().await;
        service.sessions().purge_expired();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    } else {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
}
