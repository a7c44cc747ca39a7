// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Node reservation task manager
//!
//! Coordinates exclusive and shared access to nodes across conductors,
//! using the reservation store as the only arbiter.

mod error;
mod guard;
pub mod power;
mod resource;
mod retry;
mod task;

pub use error::TaskError;
pub use guard::{ensure_exclusive, require_exclusive, require_exclusive_mut, TaskContext};
pub use resource::ResourceHandle;
pub use retry::acquire_with_retry;
pub use task::{AcquireOptions, Task, TaskManager};
