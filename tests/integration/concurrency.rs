//! Concurrent readers and writers of derived collections.

use std::sync::{Arc, Barrier};
use std::thread;

use crate::common::*;
use nutriflow::{
    aggregate_fruits_by_family, get_families_with_multiple_fruits, summary_nutrition_total_fruit,
    FAMILY_AGGREGATES_COLLECTION, NUTRITION_SUMMARY_COLLECTION,
};
use parking_lot::Mutex;

fn many_fruits(n: usize) -> Vec<Document> {
    let families = ["Rosaceae", "Musaceae", "Rutaceae", "Moraceae", "Vitaceae"];
    (0..n)
        .map(|i| {
            fruit(
                &format!("fruit-{i}"),
                families[i % families.len()],
                "Rosales",
                10.0 + i as f64,
            )
        })
        .collect()
}

#[test]
fn readers_never_observe_partial_family_aggregates() {
    let fruits = memory_fruits("partial");
    seed(&fruits, many_fruits(200));
    let expected = aggregate_fruits_by_family(&fruits).unwrap().len();
    let derived = fruits.sibling(FAMILY_AGGREGATES_COLLECTION);

    let barrier = Arc::new(Barrier::new(5));
    let observed = Arc::new(Mutex::new(Vec::new()));
    let mut workers = Vec::new();

    for _ in 0..2 {
        let fruits = fruits.clone();
        let barrier = Arc::clone(&barrier);
        workers.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..20 {
                aggregate_fruits_by_family(&fruits).unwrap();
            }
        }));
    }
    for _ in 0..3 {
        let derived = derived.clone();
        let barrier = Arc::clone(&barrier);
        let observed = Arc::clone(&observed);
        workers.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..50 {
                let rows = read_all(&derived);
                observed.lock().push(rows.len());
                let multiple = get_families_with_multiple_fruits(&derived).unwrap();
                assert!(multiple.len() <= expected);
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(observed.lock().iter().all(|&n| n == expected));
    assert_eq!(active_connections(&fruits), 0);
}

#[test]
fn concurrent_summaries_leave_exactly_one_row() {
    let fruits = memory_fruits("last-writer");
    seed(&fruits, many_fruits(50));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let fruits = fruits.clone();
            thread::spawn(move || summary_nutrition_total_fruit(&fruits).unwrap())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let stored = read_all(&fruits.sibling(NUTRITION_SUMMARY_COLLECTION));
    assert_eq!(stored.len(), 1);
    assert!(results.iter().all(|rows| rows == &stored));
}

#[test]
fn file_store_readers_see_whole_replacements() {
    let (_dir, uri) = file_store();
    let fruits = CollectionHandle::resolve(&uri, DB, FRUITS);
    seed(&fruits, many_fruits(100));
    let expected = aggregate_fruits_by_family(&fruits).unwrap().len();
    let derived = fruits.sibling(FAMILY_AGGREGATES_COLLECTION);

    let writer = {
        let fruits = fruits.clone();
        thread::spawn(move || {
            for _ in 0..10 {
                aggregate_fruits_by_family(&fruits).unwrap();
            }
        })
    };
    for _ in 0..30 {
        assert_eq!(read_all(&derived).len(), expected);
    }
    writer.join().unwrap();
}
