// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake reservation store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Claim, MemoryStore, ReservationStore, StoreError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tm_core::{HolderId, Node, NodeId, NodeUpdate};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get { id: NodeId },
    TryClaim { id: NodeId, holder: HolderId },
    Release { id: NodeId, holder: HolderId },
    Update { id: NodeId },
}

#[derive(Default)]
struct Failures {
    claim: HashSet<NodeId>,
    release: HashSet<NodeId>,
}

/// Memory-backed store that records calls and can inject failures
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store seeded with unreserved nodes using the given driver
    pub fn with_nodes<'a>(ids: impl IntoIterator<Item = &'a NodeId>, driver: &str) -> Self {
        let store = Self::new();
        for id in ids {
            store.add_node(Node::new(id.clone(), driver));
        }
        store
    }

    /// Add a node record, replacing nothing
    pub fn add_node(&self, node: Node) {
        if let Err(e) = self.inner.insert(node) {
            tracing::warn!(error = %e, "fake store ignored duplicate node");
        }
    }

    /// Pretend another holder already reserved this node
    pub fn reserve_as(&self, id: &NodeId, holder: &HolderId) {
        let _ = self.inner.try_claim(id, holder);
    }

    /// Current reservation of a node
    pub fn reservation(&self, id: &NodeId) -> Option<HolderId> {
        self.inner.reservation(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<Node> {
        self.inner.get_node(id).ok()
    }

    /// Make `try_claim` for this node fail with `Unavailable`
    pub fn fail_claims_for(&self, id: &NodeId) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .claim
            .insert(id.clone());
    }

    /// Make `release` for this node fail with `Unavailable`
    pub fn fail_releases_for(&self, id: &NodeId) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .release
            .insert(id.clone());
    }

    /// Stop injecting failures
    pub fn heal(&self) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.claim.clear();
        failures.release.clear();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Node ids passed to `try_claim`, in call order
    pub fn claimed_order(&self) -> Vec<NodeId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::TryClaim { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Node ids passed to `release`, in call order
    pub fn released_order(&self) -> Vec<NodeId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Release { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn failures(&self) -> std::sync::MutexGuard<'_, Failures> {
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ReservationStore for FakeStore {
    fn get_node(&self, id: &NodeId) -> Result<Node, StoreError> {
        self.record(StoreCall::Get { id: id.clone() });
        self.inner.get_node(id)
    }

    fn try_claim(&self, id: &NodeId, holder: &HolderId) -> Result<Claim, StoreError> {
        self.record(StoreCall::TryClaim {
            id: id.clone(),
            holder: holder.clone(),
        });
        if self.failures().claim.contains(id) {
            return Err(StoreError::Unavailable(format!("claim {} failed", id)));
        }
        self.inner.try_claim(id, holder)
    }

    fn release(&self, id: &NodeId, holder: &HolderId) -> Result<bool, StoreError> {
        self.record(StoreCall::Release {
            id: id.clone(),
            holder: holder.clone(),
        });
        if self.failures().release.contains(id) {
            return Err(StoreError::Unavailable(format!("release {} failed", id)));
        }
        self.inner.release(id, holder)
    }

    fn update_node(&self, id: &NodeId, update: &NodeUpdate) -> Result<Node, StoreError> {
        self.record(StoreCall::Update { id: id.clone() });
        self.inner.update_node(id, update)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
