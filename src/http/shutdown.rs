//! Graceful shutdown on SIGTERM/SIGINT.

use std::time::Duration;

use axum_server::Handle;

use crate::config::SHUTDOWN_GRACE_SECS;

/// Wait for Ctrl+C. Resolves never if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut signal) => {
            signal.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// On either signal the server stops accepting connections and waits up to
/// [`SHUTDOWN_GRACE_SECS`] for open ones to finish.
pub fn setup_shutdown_handler(handle: Handle) {
    tokio::spawn(async move {
        tokio::select! {
            _ = ctrl_c() => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_SECS)));
        tracing::info!(
            grace_secs = SHUTDOWN_GRACE_SECS,
            "Graceful shutdown initiated, waiting for connections to close"
        );
    });
}
