//! Status API job starter.
//!
//! The [`start_job`] function binds the status API, waits until it is listening and returns a [`Job`] handle. The
//! server stops when the shutdown token is cancelled.
//!
//! Refer to the [configuration documentation](room_service_configuration::Service) for the bind address.
use std::net::SocketAddr;
use std::sync::Arc;

use room_service_configuration::Service;
use room_service_registry::RegistrationState;
use tokio::sync::{oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::Started;
use crate::servers::status_api::routes::Status;
use crate::servers::status_api::{server, STATUS_API_LOG_TARGET};

/// A running status API.
#[derive(Debug)]
pub struct Job {
    pub local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl Job {
    /// Waits until the server stopped.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!(target: STATUS_API_LOG_TARGET, %e, "failed to cleanly join the status api");
        }
    }
}

/// Starts the status API.
///
/// # Errors
///
/// Will return an error if the socket can not be bound, or if the server stopped before it was listening.
#[instrument(skip(config, registration, shutdown))]
pub async fn start_job(
    config: &Service,
    registration: watch::Receiver<RegistrationState>,
    shutdown: CancellationToken,
) -> Result<Job, std::io::Error> {
    let bind_to = config.bind_address;

    let (tx_start, rx_start) = oneshot::channel::<Started>();

    tracing::info!(target: STATUS_API_LOG_TARGET, "Starting on: http://{bind_to}");

    let status = Status::new(Arc::from(config.app_name.as_str()), registration);

    let mut tasks = JoinSet::new();

    server::start(bind_to, tx_start, shutdown, status, &mut tasks)?;

    let local_addr = rx_start
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::BrokenPipe, format!("the status api was dropped: {e}")))?
        .local_addr;

    tracing::info!(target: STATUS_API_LOG_TARGET, "Started on: http://{local_addr}");

    let task = tokio::spawn(async move {
        while let Some(task) = tasks.join_next().await {
            match task {
                Ok(Ok(())) => (),
                Ok(Err(e)) => tracing::error!(target: STATUS_API_LOG_TARGET, %e, %local_addr, "task failed with error"),
                Err(e) => tracing::error!(target: STATUS_API_LOG_TARGET, %e, %local_addr, "failed to cleanly join task"),
            }
        }

        tracing::info!(target: STATUS_API_LOG_TARGET, "Stopped server running on: http://{local_addr}");
    });

    Ok(Job { local_addr, task })
}
