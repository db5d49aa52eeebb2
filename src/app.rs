//! Room service application.
//!
//! The application wires the packages together:
//!
//! 1. It builds the instance descriptor, from the configured address or from the first non-loopback IPv4 address of
//!    the host. Without an address the service can not be registered and the application fails.
//! 2. It starts the status API, which serves the pages the registration advertises.
//! 3. It runs the registration lifecycle until the shutdown token is cancelled.
//! 4. Once deregistered, it waits for the status API to stop.
//!
//! The caller owns the shutdown token and chooses the exit status. See [`EXIT_STOPPED`] and [`EXIT_FATAL`].
use std::net::SocketAddr;

use room_service_configuration::Configuration;
use room_service_registry::states::Unregistered;
use room_service_registry::{run_until_shutdown, Client, DescriptorBuilder, HttpTransport, Outcome, Timing};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::bootstrap::jobs::status_api;

/// The exit status after leaving the registry on a termination signal.
pub const EXIT_STOPPED: u8 = 1;

/// The exit status when the service can not start.
pub const EXIT_FATAL: u8 = 2;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to resolve the address to advertise: {source}")]
    UnresolvedAddress { source: room_service_registry::Error },

    #[error("Unable to create the registry transport: {source}")]
    Transport { source: room_service_registry::Error },

    #[error("Unable to start the status api on {bind_to}: {source}")]
    StatusApi { bind_to: SocketAddr, source: std::io::Error },

    #[error("The registration task failed: {source}")]
    Lifecycle { source: tokio::task::JoinError },
}

/// A started application.
#[derive(Debug)]
pub struct Running {
    pub status_api: status_api::Job,
    lifecycle: JoinHandle<Outcome>,
}

impl Running {
    /// Waits until the instance left the registry and the status API stopped.
    ///
    /// # Errors
    ///
    /// Will return an error if the registration task panicked.
    pub async fn wait(self) -> Result<Outcome, Error> {
        let outcome = self.lifecycle.await.map_err(|source| Error::Lifecycle { source })?;

        self.status_api.stopped().await;

        Ok(outcome)
    }
}

/// Starts the status API and the registration lifecycle.
///
/// # Errors
///
/// Will return an error if there is no address to advertise, or if the status API can not be bound.
pub async fn start(config: &Configuration, shutdown: CancellationToken) -> Result<Running, Error> {
    let builder = descriptor_builder(config)?;

    tracing::info!(
        app_name = builder.app_name(),
        ip_address = %builder.ip_address(),
        registry = %config.registry.base_url,
        "starting room service"
    );

    let transport = HttpTransport::new(config.registry.base_url.clone(), config.registry.request_timeout)
        .map_err(|source| Error::Transport { source })?;

    let client = Client::new(
        transport,
        Timing::new(config.registry.retry_interval, config.registry.heartbeat_interval),
    );

    let status_api = status_api::start_job(&config.service, client.subscribe(), shutdown.clone())
        .await
        .map_err(|source| Error::StatusApi {
            bind_to: config.service.bind_address,
            source,
        })?;

    let lifecycle = tokio::spawn(run_until_shutdown(Unregistered::new(client, builder), shutdown));

    Ok(Running { status_api, lifecycle })
}

/// Runs the application until `shutdown` is cancelled and the instance left the registry.
///
/// # Errors
///
/// Will return an error if the application can not start. See [`start`].
pub async fn run(config: &Configuration, shutdown: CancellationToken) -> Result<Outcome, Error> {
    start(config, shutdown).await?.wait().await
}

fn descriptor_builder(config: &Configuration) -> Result<DescriptorBuilder, Error> {
    let service = &config.service;

    match service.ip_address {
        Some(ip_address) => Ok(DescriptorBuilder::new(
            &service.app_name,
            ip_address,
            service.port,
            service.secure_port,
        )),
        None => DescriptorBuilder::with_local_address(&service.app_name, service.port, service.secure_port)
            .map_err(|source| Error::UnresolvedAddress { source }),
    }
}
