// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller-side backoff around task acquisition

use crate::error::TaskError;
use crate::task::{AcquireOptions, Task, TaskManager};
use tm_core::{NodeSet, RetryConfig};

/// Acquire, retrying while a node is locked by another holder.
///
/// Only `NodeLocked` is retried; any other failure returns at once. Each
/// attempt is a complete all-or-nothing acquisition, so nothing is held
/// while waiting.
pub async fn acquire_with_retry(
    manager: &TaskManager,
    ids: impl Into<NodeSet>,
    options: &AcquireOptions,
    retry: &RetryConfig,
) -> Result<Task, TaskError> {
    let ids = ids.into();
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match manager.acquire_with(ids.clone(), options) {
            Err(e) if e.is_locked() && attempt < max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    "node locked, retrying"
                );
                tokio::time::sleep(retry.interval).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
