//! `serve`: run the HTTP API until Ctrl-C.

use std::sync::Arc;

use surfbatch_core::Service;
use surfbatch_server::RouterOptions;
use tracing::info;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: &ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;
    if let Some(ref listen) = args.listen {
        cfg.server.listen.clone_from(listen);
    }
    let addr = surfbatch_config::listen_addr(&cfg)?;
    let upstream = config::upstream(&cfg, global)?;

    let options = RouterOptions {
        secure_cookies: args.secure_cookies || cfg.server.secure_cookies,
    };
    let service = Arc::new(Service::new(&upstream)?);

    info!(
        upstream = %upstream.base_url,
        session_ttl_hours = upstream.session_ttl.as_secs() / 3600,
        "starting server"
    );
    surfbatch_server::serve(addr, service, options).await?;
    Ok(())
}
