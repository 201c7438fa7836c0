//! # sima-server
//!
//! axum REST surface over [`SimaService`]. Handlers are thin: they resolve
//! the calling principal, check its role, parse the request and delegate to
//! the store. Every failure, body rejections included, goes through
//! [`error::ApiError`] for a uniform JSON error body.

pub mod auth;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use sima_config::ServerConfig;
use sima_db::service::SimaService;

pub use routes::router;
pub use state::AppState;

/// Bind `config.bind` and serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(service: SimaService, config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    if config.requires_auth() {
        tracing::info!(bind = %config.bind, principals = config.tokens.len(), "serving with bearer auth");
    } else {
        tracing::warn!(bind = %config.bind, "no [server].tokens configured, serving without auth");
    }
    let app = router(AppState::new(Arc::new(service), config));
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
