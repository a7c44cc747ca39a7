// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tm-core: shared types for the node reservation task manager
//!
//! This crate provides:
//! - Node and holder identifiers, and ordered node sets
//! - Node records and partial updates
//! - Lock modes and the pure reservation claim decision
//! - Conductor configuration

pub mod config;
pub mod id;
pub mod node;
pub mod reservation;

pub use config::{ConductorConfig, ConfigError, RetryConfig};
pub use id::{HolderId, NodeId, NodeSet};
pub use node::{Node, NodeUpdate, PowerState};
pub use reservation::{decide_claim, may_release, ClaimOutcome, LockMode};
