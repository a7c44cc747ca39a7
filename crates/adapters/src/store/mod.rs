// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation store adapters
//!
//! The store is the single source of truth for node reservations. Mutual
//! exclusion across conductors depends entirely on `try_claim` and `release`
//! being atomic with respect to the reservation field.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use thiserror::Error;
use tm_core::{ClaimOutcome, HolderId, Node, NodeId, NodeUpdate};

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("node not found: {0}")]
    NotFound(NodeId),
    #[error("node already exists: {0}")]
    AlreadyExists(NodeId),
    #[error("invalid node id: {0:?}")]
    InvalidId(NodeId),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a conditional claim together with the node as it stands afterwards
#[derive(Clone, Debug, PartialEq)]
pub struct Claim {
    pub outcome: ClaimOutcome,
    pub node: Node,
}

/// Persistent node records with a conditional-write reservation field
pub trait ReservationStore: Send + Sync {
    /// Read a node snapshot
    fn get_node(&self, id: &NodeId) -> Result<Node, StoreError>;

    /// Set the reservation to `holder` if it is free.
    ///
    /// Returns `AlreadyHeld` without writing when `holder` already owns it and
    /// `Conflict` when someone else does.
    fn try_claim(&self, id: &NodeId, holder: &HolderId) -> Result<Claim, StoreError>;

    /// Clear the reservation if it still belongs to `holder`.
    ///
    /// Returns `false` (and writes nothing) on a mismatch.
    fn release(&self, id: &NodeId, holder: &HolderId) -> Result<bool, StoreError>;

    /// Apply a partial update to the node's other attributes
    fn update_node(&self, id: &NodeId, update: &NodeUpdate) -> Result<Node, StoreError>;
}
