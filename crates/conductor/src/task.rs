// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task manager: scoped reservation of one or more nodes
//!
//! A [`Task`] is produced by [`TaskManager::acquire`] and owns the
//! reservations it newly claimed. Dropping the task (or calling
//! [`Task::release`]) clears exactly those reservations, in ascending node
//! order, whatever path the caller leaves the scope by.
//!
//! Reservations already held by the same holder are reused rather than
//! re-claimed, so nested tasks over the same nodes never release the outer
//! task's reservation.

use crate::error::TaskError;
use crate::resource::ResourceHandle;
use std::sync::Arc;
use tm_adapters::{Claim, Driver, DriverRegistry, ReservationStore};
use tm_core::{ClaimOutcome, ConductorConfig, HolderId, LockMode, Node, NodeId, NodeSet};

/// How to acquire a task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcquireOptions {
    pub mode: LockMode,
    /// Resolve this driver for every node instead of each node's own driver
    pub driver_override: Option<String>,
}

impl AcquireOptions {
    pub fn new(mode: LockMode) -> Self {
        Self {
            mode,
            driver_override: None,
        }
    }

    pub fn shared() -> Self {
        Self::new(LockMode::Shared)
    }

    pub fn exclusive() -> Self {
        Self::new(LockMode::Exclusive)
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver_override = Some(driver.into());
        self
    }
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self::exclusive()
    }
}

/// Acquires tasks on behalf of one holder
#[derive(Clone)]
pub struct TaskManager {
    holder: HolderId,
    store: Arc<dyn ReservationStore>,
    registry: Arc<dyn DriverRegistry>,
}

impl TaskManager {
    pub fn new(
        holder: HolderId,
        store: Arc<dyn ReservationStore>,
        registry: Arc<dyn DriverRegistry>,
    ) -> Self {
        Self {
            holder,
            store,
            registry,
        }
    }

    pub fn from_config(
        config: &ConductorConfig,
        store: Arc<dyn ReservationStore>,
        registry: Arc<dyn DriverRegistry>,
    ) -> Self {
        Self::new(config.host.clone(), store, registry)
    }

    pub fn holder(&self) -> &HolderId {
        &self.holder
    }

    pub fn store(&self) -> &Arc<dyn ReservationStore> {
        &self.store
    }

    /// Reserve `ids` in `mode`, resolving each node's own driver
    pub fn acquire(&self, ids: impl Into<NodeSet>, mode: LockMode) -> Result<Task, TaskError> {
        self.acquire_with(ids, &AcquireOptions::new(mode))
    }

    /// Reserve `ids`, all or nothing.
    ///
    /// Nodes are claimed in ascending id order. The first conflict, unknown
    /// node or unknown driver aborts the whole acquisition: every reservation
    /// this call claimed is cleared before the error is returned. Never waits
    /// for another holder.
    pub fn acquire_with(
        &self,
        ids: impl Into<NodeSet>,
        options: &AcquireOptions,
    ) -> Result<Task, TaskError> {
        let ids = ids.into();
        if ids.is_empty() {
            return Err(TaskError::EmptyRequest);
        }

        let span = tracing::debug_span!(
            "task.acquire",
            holder = %self.holder,
            mode = %options.mode,
            nodes = ids.len()
        );
        let _guard = span.enter();

        let mut task = Task {
            holder: self.holder.clone(),
            mode: options.mode,
            resources: Vec::with_capacity(ids.len()),
            store: Arc::clone(&self.store),
            released: false,
        };

        for id in &ids {
            match self.acquire_one(id, options) {
                Ok(handle) => task.resources.push(handle),
                Err(e) => {
                    tracing::info!(
                        node = %id,
                        error = %e,
                        rollback = task.claimed_ids().len(),
                        "acquisition failed, releasing partial claims"
                    );
                    if let Err(release_err) = task.release_claimed() {
                        tracing::warn!(error = %release_err, "rollback left reservations behind");
                    }
                    return Err(e);
                }
            }
        }

        tracing::debug!(
            newly_claimed = task.claimed_ids().len(),
            reused = task.len() - task.claimed_ids().len(),
            "task acquired"
        );
        Ok(task)
    }

    fn acquire_one(&self, id: &NodeId, options: &AcquireOptions) -> Result<ResourceHandle, TaskError> {
        let Claim { outcome, node } = self.store.try_claim(id, &self.holder)?;

        let claimed = match outcome {
            ClaimOutcome::Claimed => true,
            ClaimOutcome::AlreadyHeld => false,
            ClaimOutcome::Conflict(holder) => {
                return Err(TaskError::NodeLocked {
                    node: id.clone(),
                    holder,
                });
            }
        };

        let driver_name = options.driver_override.as_deref().unwrap_or(&node.driver);
        match self.registry.resolve(driver_name) {
            Ok(driver) => Ok(ResourceHandle::new(node, driver, options.mode, claimed)),
            Err(e) => {
                // Not yet in the task, so the rollback would miss it
                if claimed {
                    if let Err(release_err) = self.store.release(id, &self.holder) {
                        tracing::warn!(node = %id, error = %release_err, "failed to release node");
                    }
                }
                Err(e.into())
            }
        }
    }
}

/// A set of reserved nodes held by one holder.
///
/// Releases every reservation it newly claimed when dropped.
pub struct Task {
    holder: HolderId,
    mode: LockMode,
    /// Ascending node id order
    resources: Vec<ResourceHandle>,
    store: Arc<dyn ReservationStore>,
    released: bool,
}

impl Task {
    pub fn holder(&self) -> &HolderId {
        &self.holder
    }

    /// Mode this task was acquired in
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Handles in ascending node id order
    pub fn resources(&self) -> &[ResourceHandle] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.resources.iter().map(|r| r.node_id().clone()).collect()
    }

    /// Nodes whose reservation this task wrote and will clear
    pub fn claimed_ids(&self) -> Vec<NodeId> {
        self.resources
            .iter()
            .filter(|r| r.is_claimed())
            .map(|r| r.node_id().clone())
            .collect()
    }

    /// The store the reservations live in, for guarded updates
    pub fn store(&self) -> &dyn ReservationStore {
        self.store.as_ref()
    }

    /// True if every handle is held exclusively
    pub fn is_exclusive(&self) -> bool {
        self.resources.iter().all(ResourceHandle::is_exclusive)
    }

    /// The only handle of a single-node task
    pub fn resource(&self) -> Result<&ResourceHandle, TaskError> {
        self.single("resource")
    }

    /// Node snapshot of a single-node task
    pub fn node(&self) -> Result<&Node, TaskError> {
        self.single("node").map(ResourceHandle::node)
    }

    /// Driver of a single-node task
    pub fn driver(&self) -> Result<&Arc<dyn Driver>, TaskError> {
        self.single("driver").map(ResourceHandle::driver)
    }

    /// Reload every node snapshot from the store
    pub fn refresh(&mut self) -> Result<(), TaskError> {
        for handle in &mut self.resources {
            let node = self.store.get_node(handle.node_id())?;
            handle.set_node(node);
        }
        Ok(())
    }

    /// Release now, reporting the first store error.
    ///
    /// Every claimed node is attempted even if an earlier one fails.
    pub fn release(mut self) -> Result<(), TaskError> {
        self.release_claimed()
    }

    pub(crate) fn parts_mut(&mut self) -> (&dyn ReservationStore, &mut [ResourceHandle]) {
        (self.store.as_ref(), &mut self.resources)
    }

    fn single(&self, accessor: &'static str) -> Result<&ResourceHandle, TaskError> {
        match self.resources.as_slice() {
            [only] => Ok(only),
            all => Err(TaskError::AmbiguousAccessor {
                accessor,
                count: all.len(),
            }),
        }
    }

    fn release_claimed(&mut self) -> Result<(), TaskError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let mut first_error = None;
        for handle in self.resources.iter_mut().filter(|r| r.is_claimed()) {
            match self.store.release(handle.node_id(), &self.holder) {
                Ok(true) => handle.mark_released(),
                Ok(false) => {
                    tracing::warn!(
                        node = %handle.node_id(),
                        holder = %self.holder,
                        "reservation no longer held at release"
                    );
                    handle.mark_released();
                }
                Err(e) => {
                    tracing::warn!(node = %handle.node_id(), error = %e, "failed to release node");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if let Err(e) = self.release_claimed() {
            tracing::warn!(holder = %self.holder, error = %e, "task dropped with unreleased nodes");
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("holder", &self.holder)
            .field("mode", &self.mode)
            .field("resources", &self.resources)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
