//! Registration States Module
//!
//! This module holds the states of an instance's registration lifecycle. Each state is a distinct
//! structure, and the transitions consume the previous state, so an instance can only go forward:
//!
//! - [`Unregistered`]: The instance is not known to the registry. Provides the [`register`][Unregistered::register] method to join it.
//! - [`Registering`]: A future that retries the registration, with a fixed delay and without limit, until the registry accepts it. Upon completion, it returns the [`Registered`] structure.
//! - [`Registered`]: The registry knows the instance and a heartbeat task keeps the lease alive. Provides the [`deregister`][Registered::deregister] method to leave the registry.
//! - [`Deregistering`]: A future that stops the heartbeat task and removes the instance from the registry. Upon completion, it returns the [`Deregistered`] structure.
//! - [`Deregistered`]: The terminal state.
//!
//! There is no way back from [`Registered`] to [`Registering`]: a failed heartbeat does not trigger a new registration.

mod deregistered;
mod deregistering;
mod registered;
mod registering;
mod unregistered;

pub use deregistered::Deregistered;
pub use deregistering::Deregistering;
pub use registered::Registered;
pub use registering::{Cancelled, Registering};
pub use unregistered::Unregistered;
