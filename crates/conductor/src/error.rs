// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for task acquisition and guarded operations

use thiserror::Error;
use tm_adapters::{DriverError, StoreError};
use tm_core::{HolderId, NodeId};

/// Errors surfaced by the task manager
#[derive(Debug, Error)]
pub enum TaskError {
    /// The node is reserved by a different holder
    #[error("node {node} is locked by {holder}")]
    NodeLocked { node: NodeId, holder: HolderId },
    #[error("driver not found: {driver}")]
    DriverNotFound { driver: String },
    /// A mutating operation ran against a task holding a shared lock
    #[error("exclusive lock required, node {node} is held shared")]
    ExclusiveLockRequired { node: NodeId },
    /// Single-resource accessor used on a task with zero or several handles
    #[error("{accessor} is only available on single-node tasks (task holds {count})")]
    AmbiguousAccessor {
        accessor: &'static str,
        count: usize,
    },
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("no nodes requested")]
    EmptyRequest,
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    #[error("driver error: {0}")]
    Driver(#[source] DriverError),
}

impl TaskError {
    /// True for the conditions a caller may reasonably retry after backoff
    pub fn is_locked(&self) -> bool {
        matches!(self, TaskError::NodeLocked { .. })
    }
}

impl From<StoreError> for TaskError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => TaskError::NodeNotFound(id),
            other => TaskError::Store(other),
        }
    }
}

impl From<DriverError> for TaskError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::NotFound(driver) => TaskError::DriverNotFound { driver },
            other => TaskError::Driver(other),
        }
    }
}
