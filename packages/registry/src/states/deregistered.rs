//! Deregistered Instance - The terminal state.

use std::sync::Arc;

use crate::descriptor::InstanceIdentity;

/// An instance that left the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deregistered {
    pub(super) identity: Arc<InstanceIdentity>,
    pub(super) heartbeats: u64,
    pub(super) acknowledged: bool,
}

impl Deregistered {
    #[must_use]
    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    /// The number of heartbeats sent while registered.
    #[must_use]
    pub fn heartbeats(&self) -> u64 {
        self.heartbeats
    }

    /// Whether the registry accepted the deregistration request.
    #[must_use]
    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }
}
