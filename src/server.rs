use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::{API_PATH, Config};
use crate::db::{self, AppState};
use crate::handlers;

/// Run the API until the process receives Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let store = db::open_store(config).context("Failed to open record store")?;
    let backend = store.backend_name();
    let app = handlers::app(AppState { store });

    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.addr()))?;

    tracing::info!(
        "Funnel API listening on http://{}{} ({} store)",
        listener.local_addr()?,
        API_PATH,
        backend
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Funnel API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
