// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based reservation store
//!
//! Layout under the base directory:
//!
//! ```text
//! <base>/.lock             advisory lock held for every operation
//! <base>/nodes/<id>.json   one record per node
//! ```
//!
//! Every read-modify-write runs under an exclusive `flock` on `.lock`, so
//! conductors in separate processes that open the same directory see a
//! linearizable reservation field.

use super::{Claim, ReservationStore, StoreError};
use chrono::Utc;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tm_core::{decide_claim, may_release, HolderId, Node, NodeId, NodeUpdate};

const LOCK_FILE: &str = ".lock";
const NODES_DIR: &str = "nodes";

/// Reservation store persisted as JSON files
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at the given path, creating it if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        fs::create_dir_all(base_path.join(NODES_DIR))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Add a node record
    pub fn insert(&self, node: Node) -> Result<(), StoreError> {
        self.locked(|| {
            let path = self.path_for(&node.id)?;
            if path.exists() {
                return Err(StoreError::AlreadyExists(node.id.clone()));
            }
            self.write(&node)
        })
    }

    /// All node records, in id order
    pub fn list(&self) -> Result<Vec<Node>, StoreError> {
        self.locked(|| {
            let mut nodes = Vec::new();
            for entry in fs::read_dir(self.base_path.join(NODES_DIR))? {
                let path = entry?.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    let json = fs::read_to_string(&path)?;
                    nodes.push(serde_json::from_str::<Node>(&json)?);
                }
            }
            nodes.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(nodes)
        })
    }

    /// Run `f` while holding the store-wide advisory lock
    fn locked<T>(&self, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.base_path.join(LOCK_FILE))?;
        lock_file.lock_exclusive()?;

        let result = f();

        if let Err(e) = FileExt::unlock(&lock_file) {
            // Closing the file drops the lock anyway
            tracing::debug!(error = %e, "failed to unlock store");
        }
        result
    }

    fn path_for(&self, id: &NodeId) -> Result<PathBuf, StoreError> {
        let raw = id.as_str();
        if raw.is_empty() || raw.starts_with('.') || raw.contains(['/', '\\']) {
            return Err(StoreError::InvalidId(id.clone()));
        }
        Ok(self.base_path.join(NODES_DIR).join(format!("{}.json", raw)))
    }

    fn read(&self, id: &NodeId) -> Result<Node, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write via a temp file and rename so readers never see a partial record
    fn write(&self, node: &Node) -> Result<(), StoreError> {
        let path = self.path_for(&node.id)?;
        let temp_path = path.with_file_name(format!(".{}.json.tmp", node.id));
        let json = serde_json::to_string_pretty(node)?;

        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl ReservationStore for JsonFileStore {
    fn get_node(&self, id: &NodeId) -> Result<Node, StoreError> {
        self.locked(|| self.read(id))
    }

    fn try_claim(&self, id: &NodeId, holder: &HolderId) -> Result<Claim, StoreError> {
        self.locked(|| {
            let mut node = self.read(id)?;
            let outcome = decide_claim(node.reservation.as_ref(), holder);
            if outcome.is_new() {
                node.reservation = Some(holder.clone());
                node.updated_at = Some(Utc::now());
                self.write(&node)?;
            }
            Ok(Claim { outcome, node })
        })
    }

    fn release(&self, id: &NodeId, holder: &HolderId) -> Result<bool, StoreError> {
        self.locked(|| {
            let mut node = self.read(id)?;
            if !may_release(node.reservation.as_ref(), holder) {
                return Ok(false);
            }
            node.reservation = None;
            node.updated_at = Some(Utc::now());
            self.write(&node)?;
            Ok(true)
        })
    }

    fn update_node(&self, id: &NodeId, update: &NodeUpdate) -> Result<Node, StoreError> {
        self.locked(|| {
            let mut node = self.read(id)?;
            node.apply(update);
            node.updated_at = Some(Utc::now());
            self.write(&node)?;
            Ok(node)
        })
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
