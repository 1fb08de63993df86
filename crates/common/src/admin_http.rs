//! Lightweight admin HTTP server spawner
//!
//! Always exposes `/healthz`; callers merge their own maintenance routes.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

async fn healthz() -> &'static str { "OK" }

/// Router with `/healthz` merged into the caller-provided routes.
pub fn admin_router(routes: Router) -> Router {
    Router::new().route("/healthz", get(healthz)).merge(routes)
}

/// Bind the admin listener and serve it on a background task.
/// Binding errors are returned so startup can fail fast; serve errors are logged.
pub async fn spawn_admin_server(addr: &str, routes: Router) -> anyhow::Result<JoinHandle<()>> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "admin server listening");
    let router = admin_router(routes);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "admin server stopped");
        }
    }))
}
