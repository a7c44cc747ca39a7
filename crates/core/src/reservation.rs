// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation decisions for node locks
//!
//! The store only knows a single nullable holder per node. Lock modes live
//! in-process on each task; shared access is approximated by letting the
//! current holder re-enter its own reservation.

use crate::id::HolderId;
use serde::{Deserialize, Serialize};

/// Lock mode requested for (and recorded on) a resource handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    Shared,
    Exclusive,
}

impl LockMode {
    pub fn is_exclusive(self) -> bool {
        matches!(self, LockMode::Exclusive)
    }
}

impl std::fmt::Display for LockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockMode::Shared => write!(f, "shared"),
            LockMode::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// Result of a conditional claim on a node's reservation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Reservation was free and now belongs to the requester
    Claimed,
    /// Reservation already belonged to the requester; nothing was written
    AlreadyHeld,
    /// Reservation belongs to someone else
    Conflict(HolderId),
}

impl ClaimOutcome {
    /// True if this claim wrote the reservation and must be released by its claimant
    pub fn is_new(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClaimOutcome::Conflict(_))
    }
}

/// Decide a claim against the current reservation.
///
/// Store implementations call this while holding whatever makes their
/// read-modify-write atomic, and write `requester` only on `Claimed`.
pub fn decide_claim(current: Option<&HolderId>, requester: &HolderId) -> ClaimOutcome {
    match current {
        None => ClaimOutcome::Claimed,
        Some(holder) if holder == requester => ClaimOutcome::AlreadyHeld,
        Some(holder) => ClaimOutcome::Conflict(holder.clone()),
    }
}

/// Decide whether `requester` may clear the current reservation
pub fn may_release(current: Option<&HolderId>, requester: &HolderId) -> bool {
    current == Some(requester)
}

#[cfg(test)]
#[path = "reservation_tests.rs"]
mod tests;
