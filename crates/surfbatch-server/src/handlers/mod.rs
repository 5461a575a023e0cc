pub(crate) mod auth;
pub(crate) mod devices;

/// `GET /healthz`
pub(crate) async fn healthz() -> &'static str {
    "ok"
}
