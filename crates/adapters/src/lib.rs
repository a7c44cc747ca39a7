// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the reservation store and hardware drivers

pub mod driver;
pub mod store;
pub mod traced;

pub use driver::{Driver, DriverError, DriverRegistry, NoOpDriver, StaticDriverRegistry};
pub use store::{Claim, JsonFileStore, MemoryStore, ReservationStore, StoreError};
pub use traced::{TracedRegistry, TracedStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use driver::{DriverCall, FakeDriver, FakeDriverRegistry};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
