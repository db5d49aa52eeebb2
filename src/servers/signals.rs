//! Graceful shutdown of the servers.
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Waits for the shutdown token, then asks the server to stop accepting connections and to close the open ones
/// within `timeout`.
pub async fn graceful_shutdown(handle: axum_server::Handle, shutdown: CancellationToken, message: String, timeout: Duration) {
    shutdown.cancelled().await;

    tracing::info!("{message}");

    handle.graceful_shutdown(Some(timeout));
}
