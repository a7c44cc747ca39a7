// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive-access guard for operations that mutate node state
//!
//! Any type that can hand out its [`Task`] implements [`TaskContext`]; the
//! guard only inspects the task's handles, so no base type is required:
//!
//! ```ignore
//! struct Deployer { /* ... */ }
//!
//! impl Deployer {
//!     fn deploy(&self, task: &Task) -> Result<(), TaskError> {
//!         require_exclusive(task, |task| self.write_image(task))
//!     }
//! }
//! ```

use crate::error::TaskError;
use crate::task::Task;

/// Anything that carries a task
pub trait TaskContext {
    fn task(&self) -> &Task;
}

impl TaskContext for Task {
    fn task(&self) -> &Task {
        self
    }
}

/// Fail with `ExclusiveLockRequired` unless every handle is held exclusively
pub fn ensure_exclusive(task: &Task) -> Result<(), TaskError> {
    match task.resources().iter().find(|r| !r.is_exclusive()) {
        Some(shared) => {
            tracing::warn!(
                node = %shared.node_id(),
                holder = %task.holder(),
                "mutating operation refused on shared lock"
            );
            Err(TaskError::ExclusiveLockRequired {
                node: shared.node_id().clone(),
            })
        }
        None => Ok(()),
    }
}

/// Run `op` only if the context's task holds every node exclusively.
///
/// The op's result is returned unchanged; when the check fails the op is
/// never called.
pub fn require_exclusive<C, T, E, F>(ctx: &C, op: F) -> Result<T, E>
where
    C: TaskContext + ?Sized,
    F: FnOnce(&C) -> Result<T, E>,
    E: From<TaskError>,
{
    ensure_exclusive(ctx.task())?;
    op(ctx)
}

/// Like [`require_exclusive`], for operations that need the context mutably
pub fn require_exclusive_mut<C, T, E, F>(ctx: &mut C, op: F) -> Result<T, E>
where
    C: TaskContext + ?Sized,
    F: FnOnce(&mut C) -> Result<T, E>,
    E: From<TaskError>,
{
    ensure_exclusive(ctx.task())?;
    op(ctx)
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
