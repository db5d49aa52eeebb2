//! Deregistering Instance - An instance that is leaving the registry.
//!
//! This module contains the [`Deregistering`] future. It stops the heartbeat task, sends the deregistration
//! request and returns the [`Deregistered`] structure. It always completes: a failed deregistration is logged and
//! the registry lets the lease expire.

use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt as _;

use super::deregistered::Deregistered;

/// A future that represents an instance in the process of leaving the registry.
pub struct Deregistering {
    pub(super) deregistering: BoxFuture<'static, Deregistered>,
}

impl Future for Deregistering {
    type Output = Deregistered;

    fn poll(mut self: std::pin::Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> std::task::Poll<Self::Output> {
        self.deregistering.poll_unpin(cx)
    }
}
