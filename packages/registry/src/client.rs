//! The registration context.
//!
//! A [`Client`] bundles everything the lifecycle states share: the transport
//! (which owns the registry base url), the [`Timing`] of the retry and
//! heartbeat loops, and the current [`RegistrationState`]. It replaces any
//! process-wide registry state, so several independent registrations can
//! live in the same process.
use std::sync::Arc;
use std::time::Duration;

use derive_more::{Constructor, Display};
use tokio::sync::watch;

use crate::model::{Application, Instance};
use crate::transport::RegistryTransport;
use crate::{Error, REGISTRY_CLIENT_LOG_TARGET};

/// Where an instance is in its registration lifecycle.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    #[default]
    #[display("unregistered")]
    Unregistered,
    #[display("registering")]
    Registering,
    #[display("registered")]
    Registered,
    #[display("deregistering")]
    Deregistering,
    #[display("deregistered")]
    Deregistered,
}

/// Fixed delays of the background loops. There is no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct Timing {
    pub retry_interval: Duration,
    pub heartbeat_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    timing: Timing,
    state: watch::Sender<RegistrationState>,
}

impl<T> Client<T>
where
    T: RegistryTransport,
{
    #[must_use]
    pub fn new(transport: T, timing: Timing) -> Arc<Self> {
        let (state, _) = watch::channel(RegistrationState::default());

        Arc::new(Self {
            transport,
            timing,
            state,
        })
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    #[must_use]
    pub fn state(&self) -> RegistrationState {
        *self.state.borrow()
    }

    /// Follows the state transitions, e.g. to report them in a status page.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.state.subscribe()
    }

    /// Lists the instances of an application.
    ///
    /// # Errors
    ///
    /// Will return an error if the registry is unreachable, answers with a
    /// non-success status or with a body that is not the expected json.
    pub async fn query_instances(&self, app_name: &str) -> Result<Vec<Instance>, Error> {
        self.transport.query_instances(app_name).await
    }

    /// Lists all the applications of the registry.
    ///
    /// # Errors
    ///
    /// Will return an error if the registry is unreachable, answers with a
    /// non-success status or with a body that is not the expected json.
    pub async fn query_applications(&self) -> Result<Vec<Application>, Error> {
        self.transport.query_applications().await
    }

    pub(crate) fn transition(&self, next: RegistrationState) {
        let previous = self.state.send_replace(next);

        tracing::info!(target: REGISTRY_CLIENT_LOG_TARGET, %previous, %next, "registration state changed");
    }
}
