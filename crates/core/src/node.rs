// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node records as held by the reservation store

use crate::id::{HolderId, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Power state reported for a node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    On,
    Off,
    Rebooting,
    Error,
    #[default]
    Unknown,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "power on"),
            PowerState::Off => write!(f, "power off"),
            PowerState::Rebooting => write!(f, "rebooting"),
            PowerState::Error => write!(f, "error"),
            PowerState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Snapshot of a node.
///
/// `reservation` is the only field the task manager writes directly. A
/// non-null value means the node is locked by that holder; the lock mode is
/// never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Name of the hardware driver used to manage this node
    pub driver: String,
    #[serde(default)]
    pub reservation: Option<HolderId>,
    #[serde(default)]
    pub power_state: PowerState,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, driver: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            driver: driver.into(),
            reservation: None,
            power_state: PowerState::Unknown,
            properties: BTreeMap::new(),
            updated_at: None,
        }
    }

    pub fn with_power_state(mut self, state: PowerState) -> Self {
        self.power_state = state;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn is_reserved(&self) -> bool {
        self.reservation.is_some()
    }

    pub fn is_reserved_by(&self, holder: &HolderId) -> bool {
        self.reservation.as_ref() == Some(holder)
    }

    /// Apply a partial update. Never touches `reservation`.
    pub fn apply(&mut self, update: &NodeUpdate) {
        if let Some(state) = update.power_state {
            self.power_state = state;
        }
        for (key, value) in &update.set_properties {
            self.properties.insert(key.clone(), value.clone());
        }
        for key in &update.remove_properties {
            self.properties.remove(key);
        }
    }
}

/// Partial update applied through the store's normal update path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeUpdate {
    pub power_state: Option<PowerState>,
    pub set_properties: BTreeMap<String, Value>,
    pub remove_properties: Vec<String>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_state(mut self, state: PowerState) -> Self {
        self.power_state = Some(state);
        self
    }

    pub fn set_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_properties.insert(key.into(), value.into());
        self
    }

    pub fn remove_property(mut self, key: impl Into<String>) -> Self {
        self.remove_properties.push(key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.power_state.is_none()
            && self.set_properties.is_empty()
            && self.remove_properties.is_empty()
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
