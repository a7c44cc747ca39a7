//! Reservation lifecycle specs
//!
//! Verify what the store's reservation field looks like before, during and
//! after a task.

use crate::prelude::*;
use similar_asserts::assert_eq;

const NODES: &[&str] = &["n1", "n2", "n3", "n4", "n5"];

#[test]
fn two_hosts_contend_for_overlapping_nodes() {
    let cluster = Cluster::with_nodes(NODES);
    let host1 = cluster.conductor("host1");
    let host2 = cluster.conductor("host2");

    let task = host1.acquire(ids(&["n2", "n3"]), LockMode::Exclusive).unwrap();
    assert_eq!(
        cluster.reservations(),
        table(&[
            ("n1", None),
            ("n2", Some("host1")),
            ("n3", Some("host1")),
            ("n4", None),
            ("n5", None),
        ])
    );

    let err = host2
        .acquire(ids(&["n3", "n4"]), LockMode::Exclusive)
        .unwrap_err();
    assert_eq!(err.to_string(), "node n3 is locked by host1");
    assert_eq!(cluster.holder_of("n4"), None);
    assert_eq!(cluster.holder_of("n2").as_deref(), Some("host1"));
    assert_eq!(cluster.holder_of("n3").as_deref(), Some("host1"));

    drop(task);
    assert!(cluster.reservations().iter().all(|(_, holder)| holder.is_none()));
}

#[test]
fn failure_signal_inside_scope_still_releases() {
    fn provision(manager: &TaskManager) -> Result<(), TaskError> {
        let task = manager.acquire(ids(&["n1", "n2"]), LockMode::Exclusive)?;
        // single-node accessor on a two-node task
        let _ = task.driver()?;
        Ok(())
    }

    let cluster = Cluster::with_nodes(NODES);

    let err = provision(&cluster.conductor("host1")).unwrap_err();

    assert!(matches!(err, TaskError::AmbiguousAccessor { count: 2, .. }));
    assert_eq!(cluster.holder_of("n1"), None);
    assert_eq!(cluster.holder_of("n2"), None);
}

#[test]
fn panic_inside_scope_still_releases() {
    let cluster = Cluster::with_nodes(NODES);
    let manager = cluster.conductor("host1");

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _task = manager.acquire(ids(&["n4"]), LockMode::Exclusive).unwrap();
        panic!("operation blew up");
    }));

    assert!(outcome.is_err());
    assert_eq!(cluster.holder_of("n4"), None);
}

#[test]
fn unknown_driver_leaves_store_untouched() {
    let cluster = Cluster::with_nodes(NODES);

    let err = cluster
        .conductor("host1")
        .acquire_with(
            ids(&["n1", "n2", "n3"]),
            &AcquireOptions::exclusive().with_driver("ipmi"),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "driver not found: ipmi");
    assert!(cluster.reservations().iter().all(|(_, holder)| holder.is_none()));
}

#[test]
fn unknown_node_leaves_store_untouched() {
    let cluster = Cluster::with_nodes(NODES);

    let err = cluster
        .conductor("host1")
        .acquire(ids(&["n1", "n9"]), LockMode::Exclusive)
        .unwrap_err();

    assert!(matches!(err, TaskError::NodeNotFound(ref id) if id.as_str() == "n9"));
    assert_eq!(cluster.holder_of("n1"), None);
}

#[test]
fn released_nodes_can_be_taken_by_another_host() {
    let cluster = Cluster::with_nodes(NODES);

    cluster
        .conductor("host1")
        .acquire(ids(&["n5"]), LockMode::Exclusive)
        .unwrap()
        .release()
        .unwrap();
    let task = cluster
        .conductor("host2")
        .acquire(ids(&["n5"]), LockMode::Exclusive)
        .unwrap();

    assert_eq!(task.node().unwrap().reservation, Some(HolderId::new("host2")));
}
