// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::driver::{Driver, DriverError, DriverRegistry};
use crate::store::{Claim, ReservationStore, StoreError};
use std::sync::Arc;
use tm_core::{ClaimOutcome, HolderId, Node, NodeId, NodeUpdate};

/// Wrapper that adds tracing to any ReservationStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ReservationStore> ReservationStore for TracedStore<S> {
    fn get_node(&self, id: &NodeId) -> Result<Node, StoreError> {
        let result = self.inner.get_node(id);
        tracing::trace!(node = %id, found = result.is_ok(), "read node");
        result
    }

    fn try_claim(&self, id: &NodeId, holder: &HolderId) -> Result<Claim, StoreError> {
        let span = tracing::info_span!("store.try_claim", node = %id, holder = %holder);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.try_claim(id, holder);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(Claim {
                outcome: ClaimOutcome::Claimed,
                ..
            }) => tracing::debug!(elapsed_ms, "reservation claimed"),
            Ok(Claim {
                outcome: ClaimOutcome::AlreadyHeld,
                ..
            }) => tracing::debug!(elapsed_ms, "reservation already held"),
            Ok(Claim {
                outcome: ClaimOutcome::Conflict(current),
                ..
            }) => tracing::info!(elapsed_ms, current = %current, "reservation conflict"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "claim failed"),
        }

        result
    }

    fn release(&self, id: &NodeId, holder: &HolderId) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.release", node = %id, holder = %holder);
        let _guard = span.enter();

        let result = self.inner.release(id, holder);
        match &result {
            Ok(true) => tracing::debug!("reservation released"),
            Ok(false) => tracing::warn!("reservation not held by releaser, left untouched"),
            Err(e) => tracing::error!(error = %e, "release failed"),
        }

        result
    }

    fn update_node(&self, id: &NodeId, update: &NodeUpdate) -> Result<Node, StoreError> {
        let span = tracing::info_span!("store.update_node", node = %id);
        let _guard = span.enter();

        let result = self.inner.update_node(id, update);
        match &result {
            Ok(node) => tracing::info!(power_state = %node.power_state, "node updated"),
            Err(e) => tracing::error!(error = %e, "update failed"),
        }

        result
    }
}

/// Wrapper that adds tracing to any DriverRegistry
#[derive(Clone)]
pub struct TracedRegistry<R> {
    inner: R,
}

impl<R> TracedRegistry<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: DriverRegistry> DriverRegistry for TracedRegistry<R> {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Driver>, DriverError> {
        let result = self.inner.resolve(name);
        match &result {
            Ok(_) => tracing::trace!(driver = name, "driver resolved"),
            Err(e) => tracing::warn!(driver = name, error = %e, "driver lookup failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
