//! Registering Instance - An instance that is being registered.
//!
//! This module contains the [`Registering`] future. It sends the registration document until the registry accepts
//! it, waiting [`Timing::retry_interval`][crate::Timing] between two attempts. There is no maximum number of
//! attempts and no backoff: a service that can not be registered is of no use, so it waits for the registry.
//!
//! A cancellation stops the retries, but an attempt already sent is awaited (it is bounded by the request timeout).
//! If the registry accepts it, the future still resolves to [`Registered`], so the caller deregisters the instance.
//!
//! Upon success it starts the heartbeat task and returns the [`Registered`] structure.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt as _;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::registered::Registered;
use crate::client::{Client, RegistrationState};
use crate::descriptor::InstanceIdentity;
use crate::transport::RegistryTransport;
use crate::REGISTRY_CLIENT_LOG_TARGET;

/// The registration was cancelled before the registry accepted it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Registration cancelled after {attempts} failed attempts")]
pub struct Cancelled {
    pub attempts: u64,
}

/// A future that represents an instance in the process of being registered.
pub struct Registering<T> {
    pub(super) registering: BoxFuture<'static, Result<Registered<T>, Cancelled>>,
}

impl<T> Future for Registering<T> {
    type Output = Result<Registered<T>, Cancelled>;

    fn poll(mut self: std::pin::Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> std::task::Poll<Self::Output> {
        self.registering.poll_unpin(cx)
    }
}

pub(super) async fn retry_until_registered<T>(
    client: Arc<Client<T>>,
    identity: Arc<InstanceIdentity>,
    cancel: CancellationToken,
) -> Result<Registered<T>, Cancelled>
where
    T: RegistryTransport,
{
    let document = identity.to_document();
    let retry_interval = client.timing().retry_interval;
    let app_name = identity.app_name();

    let mut attempts: u64 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(abandon(&client, attempts));
        }

        attempts += 1;

        // Awaited even when cancelled: an accepted attempt must be deregistered.
        if client.transport().register(&document).await {
            break;
        }

        if cancel.is_cancelled() {
            return Err(abandon(&client, attempts));
        }

        tracing::warn!(
            target: REGISTRY_CLIENT_LOG_TARGET,
            app_name,
            attempts,
            ?retry_interval,
            "registration attempt failed, retrying"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(abandon(&client, attempts)),
            () = tokio::time::sleep(retry_interval) => {}
        }
    }

    tracing::info!(
        target: REGISTRY_CLIENT_LOG_TARGET,
        app_name,
        instance_key = %identity.instance_key(),
        attempts,
        "registration accepted"
    );

    Ok(Registered::start(client, identity, attempts))
}

fn abandon<T>(client: &Client<T>, attempts: u64) -> Cancelled
where
    T: RegistryTransport,
{
    client.transition(RegistrationState::Unregistered);

    tracing::info!(target: REGISTRY_CLIENT_LOG_TARGET, attempts, "registration cancelled");

    Cancelled { attempts }
}
