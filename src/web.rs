use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::ServerConfig;

/// Requests are cut off a little after the upstream calls would time out
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

pub fn app(state: AppState, upstream_timeout: Duration) -> Router {
    Router::new()
        .nest("/api", api::router(state))
        .layer(TimeoutLayer::new(upstream_timeout + REQUEST_TIMEOUT_SLACK))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(server: &ServerConfig, state: AppState, upstream_timeout: Duration) -> Result<()> {
    let app = app(state, upstream_timeout);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Web server terminated unexpectedly")?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
