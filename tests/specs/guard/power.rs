//! Guarded power change specs
//!
//! Mutating operations run only under an exclusive task.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tm_conductor::power::{get_power_state, set_power_state};

#[test]
fn exclusive_task_powers_nodes_on() {
    let cluster = Cluster::with_nodes(&["n1", "n2"]);
    let mut task = cluster
        .conductor("host1")
        .acquire(ids(&["n1", "n2"]), LockMode::Exclusive)
        .unwrap();

    set_power_state(&mut task, PowerState::On).unwrap();

    let states: Vec<PowerState> = cluster.store.list().iter().map(|n| n.power_state).collect();
    assert_eq!(states, vec![PowerState::On, PowerState::On]);
}

#[test]
fn shared_task_is_refused_and_store_unchanged() {
    let cluster = Cluster::with_nodes(&["n1"]);
    let mut task = cluster
        .conductor("host1")
        .acquire(ids(&["n1"]), LockMode::Shared)
        .unwrap();
    let before = cluster.store.list();

    let err = set_power_state(&mut task, PowerState::Off).unwrap_err();

    assert_eq!(err.to_string(), "exclusive lock required, node n1 is held shared");
    assert_eq!(cluster.store.list(), before);
    assert_eq!(
        get_power_state(&task).unwrap(),
        vec![(NodeId::new("n1"), PowerState::Unknown)]
    );
}

#[test]
fn custom_operation_through_the_guard() {
    let cluster = Cluster::with_nodes(&["n1"]);
    let manager = cluster.conductor("host1");

    let tag = |task: &Task| -> Result<Node, TaskError> {
        let id = task.node()?.id.clone();
        Ok(task
            .store()
            .update_node(&id, &tm_core::NodeUpdate::new().set_property("owner", "ops"))?)
    };

    let shared = manager.acquire(ids(&["n1"]), LockMode::Shared).unwrap();
    assert!(tm_conductor::require_exclusive(&shared, tag).is_err());
    drop(shared);

    let exclusive = manager.acquire(ids(&["n1"]), LockMode::Exclusive).unwrap();
    let node = tm_conductor::require_exclusive(&exclusive, tag).unwrap();
    assert_eq!(node.properties.get("owner").and_then(|v| v.as_str()), Some("ops"));
}
