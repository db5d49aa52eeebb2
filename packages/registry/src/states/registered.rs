//! Registered Instance - An instance that the registry knows.
//!
//! This module contains the [`Registered`] struct. While it lives, a heartbeat task renews the lease of the instance.
//! Its [`deregister`][Registered::deregister] method moves it into the [`Deregistering`] state.

use std::sync::Arc;

use futures::FutureExt as _;

use super::deregistered::Deregistered;
use super::deregistering::Deregistering;
use crate::client::{Client, RegistrationState};
use crate::descriptor::InstanceIdentity;
use crate::heartbeat::Heartbeat;
use crate::transport::RegistryTransport;
use crate::REGISTRY_CLIENT_LOG_TARGET;

/// An instance accepted by the registry.
#[derive(Debug)]
pub struct Registered<T> {
    client: Arc<Client<T>>,
    identity: Arc<InstanceIdentity>,
    attempts: u64,
    heartbeat: Heartbeat,
}

impl<T> Registered<T>
where
    T: RegistryTransport,
{
    pub(super) fn start(client: Arc<Client<T>>, identity: Arc<InstanceIdentity>, attempts: u64) -> Self {
        client.transition(RegistrationState::Registered);

        let heartbeat = Heartbeat::start(client.clone(), identity.clone());

        Self {
            client,
            identity,
            attempts,
            heartbeat,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    /// The number of registration requests it took, the successful one
    /// included.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    #[must_use]
    pub fn client(&self) -> &Arc<Client<T>> {
        &self.client
    }

    /// Leaves the registry.
    ///
    /// The heartbeat task is stopped first, so no heartbeat can follow the
    /// deregistration. The deregistration itself is best effort: a failure
    /// is logged and reported by [`Deregistered::acknowledged`].
    #[must_use]
    pub fn deregister(self) -> Deregistering {
        let Self {
            client,
            identity,
            attempts: _,
            heartbeat,
        } = self;

        client.transition(RegistrationState::Deregistering);

        let deregistering = async move {
            let heartbeats = match heartbeat.stop().await {
                Ok(heartbeats) => heartbeats,
                Err(e) => {
                    tracing::error!(target: REGISTRY_CLIENT_LOG_TARGET, %e, "heartbeat task failed");
                    0
                }
            };

            let instance_key = identity.instance_key();

            let acknowledged = client.transport().deregister(&identity).await;

            if acknowledged {
                tracing::info!(target: REGISTRY_CLIENT_LOG_TARGET, %instance_key, "deregistered");
            } else {
                tracing::warn!(target: REGISTRY_CLIENT_LOG_TARGET, %instance_key, "deregistration failed, the lease will expire");
            }

            client.transition(RegistrationState::Deregistered);

            Deregistered {
                identity,
                heartbeats,
                acknowledged,
            }
        }
        .boxed();

        Deregistering { deregistering }
    }
}
