//! Serve command

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use orbit_core::{DiscoveryConfig, GitHubSource};
use tokio::net::TcpListener;

use crate::http::{self, APPROVED_PACKAGES_PATH, AppState};

/// Listen on `bind` until Ctrl-C.
pub async fn serve(config: DiscoveryConfig, bind: SocketAddr) -> Result<()> {
    let source = GitHubSource::new(&config).context("Failed to build GitHub client")?;

    match &config.repository {
        Some(repo) => tracing::info!(repository = %repo, "discovering from repository"),
        None => tracing::warn!(
            "ORBIT_PACKAGES_REPO not set; {APPROVED_PACKAGES_PATH} will return an empty list"
        ),
    }

    let router = http::router(AppState::new(config, Arc::new(source)));

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!(addr = %listener.local_addr()?, "starting server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
