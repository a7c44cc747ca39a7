// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Power operations on reserved nodes

use crate::error::TaskError;
use crate::guard::require_exclusive_mut;
use crate::task::Task;
use std::sync::Arc;
use tm_core::{NodeId, NodeUpdate, PowerState};

/// Property recording the last driver failure on a node
pub const LAST_ERROR: &str = "last_error";

/// Drive every node in the task to `target` and persist the result.
///
/// Requires an exclusive task. Nodes are processed in ascending order and
/// processing stops at the first driver failure; that node gets a
/// `last_error` property and nodes before it keep their new state.
pub fn set_power_state(task: &mut Task, target: PowerState) -> Result<(), TaskError> {
    require_exclusive_mut(task, |task| {
        let (store, resources) = task.parts_mut();
        for handle in resources.iter_mut() {
            let driver = Arc::clone(handle.driver());
            let id = handle.node_id().clone();

            match driver.set_power_state(handle.node(), target) {
                Ok(reached) => {
                    let node = store.update_node(
                        &id,
                        &NodeUpdate::new()
                            .power_state(reached)
                            .remove_property(LAST_ERROR),
                    )?;
                    tracing::info!(node = %id, power_state = %reached, "power state changed");
                    handle.set_node(node);
                }
                Err(e) => {
                    tracing::error!(node = %id, target = %target, error = %e, "power change failed");
                    let node = store.update_node(
                        &id,
                        &NodeUpdate::new().set_property(LAST_ERROR, e.to_string()),
                    )?;
                    handle.set_node(node);
                    return Err(e.into());
                }
            }
        }
        Ok(())
    })
}

/// Ask each node's driver for its power state; allowed under a shared lock
pub fn get_power_state(task: &Task) -> Result<Vec<(NodeId, PowerState)>, TaskError> {
    task.resources()
        .iter()
        .map(|r| -> Result<(NodeId, PowerState), TaskError> {
            let state = r.driver().get_power_state(r.node())?;
            Ok((r.node_id().clone(), state))
        })
        .collect()
}

#[cfg(test)]
#[path = "power_tests.rs"]
mod tests;
