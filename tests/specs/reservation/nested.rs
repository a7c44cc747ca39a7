//! Nested task specs
//!
//! A holder may acquire nodes it already holds; only the outermost task that
//! claimed a node releases it.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn shared_outer_exclusive_inner() {
    let cluster = Cluster::with_nodes(&["n1", "n2"]);
    let manager = cluster.conductor("host1");

    let outer = manager.acquire(ids(&["n1", "n2"]), LockMode::Shared).unwrap();
    {
        let mut inner = manager
            .acquire(ids(&["n1", "n2"]), LockMode::Exclusive)
            .unwrap();
        tm_conductor::power::set_power_state(&mut inner, PowerState::On).unwrap();
    }
    assert_eq!(cluster.holder_of("n1").as_deref(), Some("host1"));
    assert_eq!(cluster.holder_of("n2").as_deref(), Some("host1"));

    drop(outer);
    assert_eq!(cluster.holder_of("n1"), None);
    assert_eq!(cluster.holder_of("n2"), None);
}

#[test]
fn inner_task_on_other_nodes_releases_only_its_own() {
    let cluster = Cluster::with_nodes(&["n1", "n2", "n3"]);
    let manager = cluster.conductor("host1");

    let outer = manager.acquire(ids(&["n1"]), LockMode::Exclusive).unwrap();
    let inner = manager.acquire(ids(&["n2", "n3"]), LockMode::Exclusive).unwrap();
    drop(inner);

    assert_eq!(
        cluster.reservations(),
        table(&[("n1", Some("host1")), ("n2", None), ("n3", None)])
    );
    drop(outer);
}

#[test]
fn shared_lock_of_other_host_blocks() {
    let cluster = Cluster::with_nodes(&["n1"]);

    let _reader = cluster
        .conductor("host1")
        .acquire(ids(&["n1"]), LockMode::Shared)
        .unwrap();
    let result = cluster
        .conductor("host2")
        .acquire(ids(&["n1"]), LockMode::Shared);

    assert!(matches!(result, Err(TaskError::NodeLocked { .. })));
}
