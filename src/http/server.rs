//! Listener setup and the serve loop.

use super::router;
use crate::config::ServerConfig;
use crate::storage::SuggestionStore;
use crate::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Binds `0.0.0.0:{port}` and serves the application until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, store: Arc<dyn SuggestionStore>) -> Result<()> {
    let app = router(store, &config.static_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "bind".to_string(),
            cause: format!("{addr}: {e}"),
        })?;

    tracing::info!(
        port = config.port,
        db_path = %config.db_path.display(),
        static_dir = %config.static_dir.display(),
        "Server starting"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::OperationFailed {
            operation: "serve".to_string(),
            cause: e.to_string(),
        })
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        },
    }
}
