// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver registry built once at conductor startup

use super::{Driver, DriverError, DriverRegistry};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry over a fixed set of drivers, keyed by driver name
#[derive(Clone, Default)]
pub struct StaticDriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl StaticDriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under its own name
    pub fn with_driver(mut self, driver: impl Driver + 'static) -> Self {
        self.register(Arc::new(driver));
        self
    }

    /// Register a shared driver, replacing any driver with the same name
    pub fn register(&mut self, driver: Arc<dyn Driver>) {
        self.drivers.insert(driver.name().to_string(), driver);
    }

    /// Registered driver names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl DriverRegistry for StaticDriverRegistry {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Driver>, DriverError> {
        self.drivers
            .get(name)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
