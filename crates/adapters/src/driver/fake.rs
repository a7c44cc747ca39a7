// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake drivers for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Driver, DriverError, DriverRegistry, StaticDriverRegistry};
use std::sync::{Arc, Mutex};
use tm_core::{Node, NodeId, PowerState};

/// Recorded driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    GetPower { node: NodeId },
    SetPower { node: NodeId, target: PowerState },
    Resolve { name: String },
}

/// Driver that records calls and can be told to fail power changes
#[derive(Clone, Debug)]
pub struct FakeDriver {
    name: String,
    calls: Arc<Mutex<Vec<DriverCall>>>,
    fail_power: Arc<Mutex<Option<String>>>,
}

impl FakeDriver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::default(),
            fail_power: Arc::default(),
        }
    }

    /// Make every subsequent `set_power_state` fail with `message`
    pub fn fail_power_with(&self, message: impl Into<String>) {
        *self.fail_power.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: DriverCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

impl Driver for FakeDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_power_state(&self, node: &Node) -> Result<PowerState, DriverError> {
        self.record(DriverCall::GetPower {
            node: node.id.clone(),
        });
        Ok(node.power_state)
    }

    fn set_power_state(&self, node: &Node, target: PowerState) -> Result<PowerState, DriverError> {
        self.record(DriverCall::SetPower {
            node: node.id.clone(),
            target,
        });
        let failure = self
            .fail_power
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match failure {
            Some(message) => Err(DriverError::PowerFailed {
                driver: self.name.clone(),
                node: node.id.to_string(),
                message,
            }),
            None => Ok(target),
        }
    }
}

/// Registry that records every lookup
#[derive(Clone, Default)]
pub struct FakeDriverRegistry {
    inner: StaticDriverRegistry,
    calls: Arc<Mutex<Vec<DriverCall>>>,
}

impl FakeDriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding a single `FakeDriver` named `"fake"`
    pub fn with_fake() -> (Self, FakeDriver) {
        let driver = FakeDriver::new("fake");
        (Self::new().with_driver(driver.clone()), driver)
    }

    pub fn with_driver(mut self, driver: impl Driver + 'static) -> Self {
        self.inner.register(Arc::new(driver));
        self
    }

    /// Names passed to `resolve`, in call order
    pub fn resolved(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter_map(|c| match c {
                DriverCall::Resolve { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DriverRegistry for FakeDriverRegistry {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Driver>, DriverError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(DriverCall::Resolve {
                name: name.to_string(),
            });
        self.inner.resolve(name)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
