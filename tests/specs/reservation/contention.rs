//! Contention specs
//!
//! Many conductors race for the same nodes from separate threads.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

#[test]
fn exactly_one_host_wins_a_contended_node() {
    let cluster = Arc::new(Cluster::with_nodes(&["n1"]));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cluster = Arc::clone(&cluster);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let manager = cluster.conductor(&format!("host{i}"));
                barrier.wait();
                manager.acquire(ids(&["n1"]), LockMode::Exclusive)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(TaskError::is_locked));
}

#[test]
fn overlapping_batches_never_leak_reservations() {
    let names = ["n1", "n2", "n3", "n4", "n5", "n6"];
    let cluster = Arc::new(Cluster::with_nodes(&names));

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let cluster = Arc::clone(&cluster);
            thread::spawn(move || {
                let manager = cluster.conductor(&format!("host{i}"));
                // each host wants three consecutive nodes, wrapping around
                let wanted: Vec<&str> = (0..3).map(|k| names[(i + k) % names.len()]).collect();
                for _ in 0..50 {
                    if let Ok(task) = manager.acquire(ids(&wanted), LockMode::Exclusive) {
                        for node in task.node_ids() {
                            let holder = cluster.store.reservation(&node);
                            assert_eq!(holder, Some(task.holder().clone()));
                        }
                        thread::sleep(Duration::from_micros(100));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cluster.reservations().iter().all(|(_, holder)| holder.is_none()));
}

#[tokio::test]
async fn retrying_host_gets_node_after_holder_finishes() {
    let cluster = Arc::new(Cluster::with_nodes(&["n1"]));
    let held = cluster
        .conductor("host1")
        .acquire(ids(&["n1"]), LockMode::Exclusive)
        .unwrap();

    let worker = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(held);
    });

    let retry = tm_core::RetryConfig::new(100, Duration::from_millis(5));
    let task = tm_conductor::acquire_with_retry(
        &cluster.conductor("host2"),
        ids(&["n1"]),
        &AcquireOptions::exclusive(),
        &retry,
    )
    .await
    .unwrap();
    worker.await.unwrap();

    assert_eq!(task.node().unwrap().reservation, Some(HolderId::new("host2")));
}
