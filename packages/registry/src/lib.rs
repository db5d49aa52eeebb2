//! A client joining a [Eureka](https://github.com/Netflix/eureka/wiki/Eureka-REST-operations)
//! discovery registry.
//!
//! The client registers one instance of a service, keeps the registration
//! alive with periodic heartbeats and leaves the registry when the process is
//! asked to stop.
//!
//! ```text
//! DescriptorBuilder -> Unregistered -> Registering -> Registered -> Deregistering -> Deregistered
//!                                        (retries)     (heartbeat)
//! ```
//!
//! - [`descriptor`]: the identity of the instance and the document sent to the registry.
//! - [`transport`]: the REST calls, behind the [`RegistryTransport`] trait.
//! - [`states`]: the registration lifecycle, one type per state.
//! - [`heartbeat`]: the task renewing the lease while registered.
//! - [`signals`]: the termination signals, turned into a cancellation token.
//! - [`lifecycle`]: everything above, from the first attempt to the deregistration.
//!
//! Registration, heartbeats and deregistration never fail: a failed call is
//! logged and either retried or dropped. Only the queries and the startup
//! preconditions return an [`Error`].
pub mod action;
pub mod client;
pub mod descriptor;
pub mod error;
pub mod heartbeat;
pub mod lifecycle;
pub mod model;
pub mod signals;
pub mod states;
pub mod transport;

pub use client::{Client, RegistrationState, Timing};
pub use descriptor::{DescriptorBuilder, InstanceId, InstanceIdentity};
pub use error::Error;
pub use lifecycle::{run_until_shutdown, Outcome};
pub use signals::ShutdownHandler;
pub use transport::{HttpTransport, RegistryTransport};

/// The log target of every event of the registry client.
pub const REGISTRY_CLIENT_LOG_TARGET: &str = "REGISTRY CLIENT";
