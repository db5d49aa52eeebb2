//! Logic to run the status API server.
use std::net::SocketAddr;
use std::time::Duration;

use axum_server::Handle;
use futures::FutureExt;
use tokio::sync::oneshot::Sender;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::routes::{router, Status};
use super::STATUS_API_LOG_TARGET;
use crate::bootstrap::jobs::Started;
use crate::servers::signals::graceful_shutdown;

/// Open connections are closed after this delay once the shutdown started.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts the status API server.
///
/// # Errors
///
/// It would return an error if unable to bind socket.
/// It would return an error if unable to get local address.
/// It would return an error if unable to send the started message.
#[instrument(skip(bind_to, tx, shutdown, status, tasks))]
pub fn start(
    bind_to: SocketAddr,
    tx: Sender<Started>,
    shutdown: CancellationToken,
    status: Status,
    tasks: &mut JoinSet<Result<(), std::io::Error>>,
) -> Result<(), std::io::Error> {
    let socket = std::net::TcpListener::bind(bind_to)?;
    socket.set_nonblocking(true)?;
    let local_addr = socket.local_addr()?;

    let handle = Handle::new();

    tracing::debug!(target: STATUS_API_LOG_TARGET, "Starting service with graceful shutdown in a spawned task ...");

    tasks.spawn(
        graceful_shutdown(
            handle.clone(),
            shutdown,
            format!("Shutting down status api on socket address: {local_addr}"),
            SHUTDOWN_TIMEOUT,
        )
        .map(Ok),
    );

    tasks.spawn(axum_server::from_tcp(socket).handle(handle).serve(router(status).into_make_service()));

    tx.send(Started { local_addr }).map_err(|message| {
        std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            format!("it could not send message: {message:?}"),
        )
    })
}
