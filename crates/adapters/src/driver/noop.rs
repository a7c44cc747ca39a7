// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op driver for nodes without real hardware behind them

use super::{Driver, DriverError};
use tm_core::{Node, PowerState};

/// Driver that trusts the stored power state and accepts every target
#[derive(Clone, Debug)]
pub struct NoOpDriver {
    name: String,
}

impl NoOpDriver {
    pub const DEFAULT_NAME: &'static str = "fake";

    pub fn new() -> Self {
        Self::named(Self::DEFAULT_NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for NoOpDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for NoOpDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_power_state(&self, node: &Node) -> Result<PowerState, DriverError> {
        Ok(node.power_state)
    }

    fn set_power_state(&self, _node: &Node, target: PowerState) -> Result<PowerState, DriverError> {
        Ok(target)
    }
}
