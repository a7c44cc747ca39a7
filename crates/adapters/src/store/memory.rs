// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process reservation store

use super::{Claim, ReservationStore, StoreError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tm_core::{decide_claim, may_release, HolderId, Node, NodeId, NodeUpdate};

/// Reservation store backed by a shared in-memory map.
///
/// Clones share state, so several task managers in one process can contend
/// on the same nodes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    nodes: Arc<Mutex<BTreeMap<NodeId, Node>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node record
    pub fn insert(&self, node: Node) -> Result<(), StoreError> {
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        if nodes.contains_key(&node.id) {
            return Err(StoreError::AlreadyExists(node.id));
        }
        nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// All node records, in id order
    pub fn list(&self) -> Vec<Node> {
        self.nodes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// Current reservation of a node, `None` if free or unknown
    pub fn reservation(&self, id: &NodeId) -> Option<HolderId> {
        self.nodes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .and_then(|n| n.reservation.clone())
    }
}

impl ReservationStore for MemoryStore {
    fn get_node(&self, id: &NodeId) -> Result<Node, StoreError> {
        self.nodes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn try_claim(&self, id: &NodeId, holder: &HolderId) -> Result<Claim, StoreError> {
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let outcome = decide_claim(node.reservation.as_ref(), holder);
        if outcome.is_new() {
            node.reservation = Some(holder.clone());
            node.updated_at = Some(Utc::now());
        }

        Ok(Claim {
            outcome,
            node: node.clone(),
        })
    }

    fn release(&self, id: &NodeId, holder: &HolderId) -> Result<bool, StoreError> {
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if !may_release(node.reservation.as_ref(), holder) {
            return Ok(false);
        }
        node.reservation = None;
        node.updated_at = Some(Utc::now());
        Ok(true)
    }

    fn update_node(&self, id: &NodeId, update: &NodeUpdate) -> Result<Node, StoreError> {
        let mut nodes = self.nodes.lock().unwrap_or_else(|e| e.into_inner());
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        node.apply(update);
        node.updated_at = Some(Utc::now());
        Ok(node.clone())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
