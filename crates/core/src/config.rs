// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conductor configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! host = "conductor-1"
//!
//! [retry]
//! max_attempts = 10
//! interval = "500ms"
//! ```

use crate::id::HolderId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Backoff policy for callers that wait on a locked node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total acquisition attempts, including the first
    pub max_attempts: u32,
    /// Delay between attempts
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(2),
        }
    }
}

/// Settings for one conductor process
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConductorConfig {
    /// Identity written into node reservations
    pub host: HolderId,
    pub retry: RetryConfig,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            host: HolderId::from_hostname(),
            retry: RetryConfig::default(),
        }
    }
}

impl ConductorConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: HolderId::new(host),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = HolderId::new(host);
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
