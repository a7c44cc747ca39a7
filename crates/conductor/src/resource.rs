// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-node handle held by a task

use std::sync::Arc;
use tm_adapters::Driver;
use tm_core::{LockMode, Node, NodeId};

/// One node within a task: its snapshot, its resolved driver and the lock
/// mode it is held in.
#[derive(Debug)]
pub struct ResourceHandle {
    node: Node,
    driver: Arc<dyn Driver>,
    mode: LockMode,
    /// Whether this task wrote the reservation (and so must clear it)
    claimed: bool,
}

impl ResourceHandle {
    pub(crate) fn new(node: Node, driver: Arc<dyn Driver>, mode: LockMode, claimed: bool) -> Self {
        Self {
            node,
            driver,
            mode,
            claimed,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node.id
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    pub fn is_exclusive(&self) -> bool {
        self.mode.is_exclusive()
    }

    /// True if this handle's task claimed the reservation, false if it was
    /// already held by the same holder when the task was acquired
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    pub(crate) fn set_node(&mut self, node: Node) {
        self.node = node;
    }

    pub(crate) fn mark_released(&mut self) {
        self.claimed = false;
    }
}
