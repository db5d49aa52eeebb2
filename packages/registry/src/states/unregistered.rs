//! Unregistered Instance - An instance that the registry does not know.
//!
//! This module contains the [`Unregistered`] struct, the initial state of the registration lifecycle.
//! Its [`register`][Unregistered::register] method generates the identity of the instance and moves it into the
//! [`Registering`] state.

use std::sync::Arc;

use futures::FutureExt as _;
use tokio_util::sync::CancellationToken;

use super::registering::{self, Registering};
use crate::client::{Client, RegistrationState};
use crate::descriptor::DescriptorBuilder;
use crate::transport::RegistryTransport;

/// An instance that is not registered yet.
#[derive(Debug)]
pub struct Unregistered<T> {
    client: Arc<Client<T>>,
    builder: DescriptorBuilder,
}

impl<T> Unregistered<T>
where
    T: RegistryTransport,
{
    #[must_use]
    pub fn new(client: Arc<Client<T>>, builder: DescriptorBuilder) -> Self {
        Self { client, builder }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<Client<T>> {
        &self.client
    }

    /// Starts registering the instance.
    ///
    /// A new instance id is generated here, once. Every retry of the returned
    /// [`Registering`] future sends the same identity.
    ///
    /// Cancelling `cancel` stops the retries and resolves the future with
    /// [`Cancelled`][super::Cancelled], unless the attempt in flight is
    /// accepted by the registry.
    #[must_use]
    pub fn register(self, cancel: CancellationToken) -> Registering<T> {
        let identity = Arc::new(self.builder.build());

        self.client.transition(RegistrationState::Registering);

        Registering {
            registering: registering::retry_until_registered(self.client, identity, cancel).boxed(),
        }
    }
}
