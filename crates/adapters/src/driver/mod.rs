// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hardware driver adapters

mod noop;
mod registry;

pub use noop::NoOpDriver;
pub use registry::StaticDriverRegistry;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DriverCall, FakeDriver, FakeDriverRegistry};

use std::sync::Arc;
use thiserror::Error;
use tm_core::{Node, PowerState};

/// Errors from driver lookup and driver operations
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver not found: {0}")]
    NotFound(String),
    #[error("driver {driver} failed to change power of {node}: {message}")]
    PowerFailed {
        driver: String,
        node: String,
        message: String,
    },
}

/// A loaded hardware driver
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Name the driver is registered under
    fn name(&self) -> &str;

    /// Query the node's actual power state
    fn get_power_state(&self, node: &Node) -> Result<PowerState, DriverError>;

    /// Drive the node to `target`, returning the state it ended in
    fn set_power_state(&self, node: &Node, target: PowerState) -> Result<PowerState, DriverError>;
}

/// Maps a driver type name to a loaded driver
pub trait DriverRegistry: Send + Sync {
    /// Fails with `DriverError::NotFound` for unknown names
    fn resolve(&self, name: &str) -> Result<Arc<dyn Driver>, DriverError>;
}
