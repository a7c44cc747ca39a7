//! Shared fixtures for the behavioral specs

pub use std::sync::Arc;
pub use tm_adapters::{
    MemoryStore, NoOpDriver, ReservationStore, StaticDriverRegistry, TracedRegistry, TracedStore,
};
pub use tm_conductor::{AcquireOptions, Task, TaskError, TaskManager};
pub use tm_core::{HolderId, LockMode, Node, NodeId, PowerState};

/// Several conductors sharing one in-memory reservation store
pub struct Cluster {
    pub store: MemoryStore,
    registry: StaticDriverRegistry,
}

impl Cluster {
    /// Store seeded with unreserved nodes named after `ids`, all using the
    /// default no-op driver
    pub fn with_nodes(ids: &[&str]) -> Self {
        let store = MemoryStore::new();
        for id in ids {
            store.insert(Node::new(*id, NoOpDriver::DEFAULT_NAME)).unwrap();
        }
        let registry = StaticDriverRegistry::new().with_driver(NoOpDriver::new());
        Self { store, registry }
    }

    /// A conductor for `host`, with traced adapters like a real deployment
    pub fn conductor(&self, host: &str) -> TaskManager {
        TaskManager::new(
            HolderId::new(host),
            Arc::new(TracedStore::new(self.store.clone())),
            Arc::new(TracedRegistry::new(self.registry.clone())),
        )
    }

    /// Reservation of `id` as a plain string
    pub fn holder_of(&self, id: &str) -> Option<String> {
        self.store
            .reservation(&NodeId::new(id))
            .map(|h| h.as_str().to_string())
    }

    /// Every node's reservation, in id order
    pub fn reservations(&self) -> Vec<(String, Option<String>)> {
        self.store
            .list()
            .into_iter()
            .map(|n| (n.id.to_string(), n.reservation.map(|h| h.to_string())))
            .collect()
    }
}

pub fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::new(*n)).collect()
}

/// Expected reservation table for [`Cluster::reservations`]
pub fn table(rows: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
    rows.iter()
        .map(|(id, holder)| (id.to_string(), holder.map(String::from)))
        .collect()
}
