//! The whole registration lifecycle of one instance.
//!
//! [`run_until_shutdown`] drives an [`Unregistered`] instance through every
//! state: it registers (retrying until the registry accepts it), keeps the
//! registration alive until the shutdown token is cancelled, and then
//! deregisters. The caller owns the token, usually armed by a
//! [`ShutdownHandler`](crate::signals::ShutdownHandler).
use tokio_util::sync::CancellationToken;

use crate::states::{Cancelled, Deregistered, Unregistered};
use crate::transport::RegistryTransport;
use crate::REGISTRY_CLIENT_LOG_TARGET;

/// How the lifecycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The shutdown came before the registry accepted the instance. Nothing
    /// was deregistered.
    NeverRegistered { attempts: u64 },

    /// The instance was registered and left the registry.
    Deregistered(Deregistered),
}

/// Registers the instance, waits for `shutdown`, then deregisters.
///
/// The deregistration is always attempted once registered, and the
/// heartbeat task is stopped before it.
pub async fn run_until_shutdown<T>(unregistered: Unregistered<T>, shutdown: CancellationToken) -> Outcome
where
    T: RegistryTransport,
{
    let registered = match unregistered.register(shutdown.child_token()).await {
        Ok(registered) => registered,
        Err(Cancelled { attempts }) => return Outcome::NeverRegistered { attempts },
    };

    tracing::info!(
        target: REGISTRY_CLIENT_LOG_TARGET,
        instance_key = %registered.identity().instance_key(),
        "shutdown handler armed"
    );

    shutdown.cancelled().await;

    tracing::info!(target: REGISTRY_CLIENT_LOG_TARGET, "shutdown requested, leaving the registry");

    Outcome::Deregistered(registered.deregister().await)
}
