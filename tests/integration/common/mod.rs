//! Shared test utilities for the integration suite.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

pub use nutriflow::{json, CollectionHandle, Document, Value};
use tempfile::TempDir;

pub const DB: &str = "nutrition";
pub const FRUITS: &str = "fruit-data-collection";
pub const SNACKS: &str = "snack-data-collection";

static COUNTER: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// Stores
// ============================================================================

/// A `memory://` URI no other test uses
pub fn unique_memory_uri(label: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("memory://it-{label}-{n}")
}

/// Handle on the raw fruit collection of a fresh in-memory server
pub fn memory_fruits(label: &str) -> CollectionHandle {
    CollectionHandle::resolve(&unique_memory_uri(label), DB, FRUITS)
}

/// A temp directory plus a `file://` URI rooted in it
pub fn file_store() -> (TempDir, String) {
    let dir = TempDir::new().expect("create temp dir");
    let uri = format!("file://{}", dir.path().display());
    (dir, uri)
}

// ============================================================================
// Data
// ============================================================================

/// Fruit document with a full nutrition block
pub fn fruit(name: &str, family: &str, order: &str, calories: f64) -> Document {
    Document::from_value(json!({
        "name": name,
        "family": family,
        "order": order,
        "genus": "unused",
        "nutritions": {
            "calories": calories,
            "fat": calories / 100.0,
            "sugar": calories / 10.0,
            "carbohydrates": calories / 5.0,
            "protein": 1.0
        }
    }))
    .expect("fruit is an object")
}

/// Apple, Pear (Rosaceae) and Banana (Musaceae)
pub fn apple_pear_banana() -> Vec<Document> {
    vec![
        fruit("Apple", "Rosaceae", "Rosales", 52.0),
        fruit("Pear", "Rosaceae", "Rosales", 57.0),
        fruit("Banana", "Musaceae", "Zingiberales", 89.0),
    ]
}

/// Insert documents through a handle
pub fn seed(handle: &CollectionHandle, docs: Vec<Document>) {
    handle
        .connect()
        .expect("connect")
        .insert_many(handle.namespace(), docs)
        .expect("insert");
}

/// Every document of a collection
pub fn read_all(handle: &CollectionHandle) -> Vec<Document> {
    handle
        .connect()
        .expect("connect")
        .find(
            handle.namespace(),
            &nutriflow::Filter::All,
            &nutriflow::Projection::all(),
        )
        .expect("find")
}

/// Live connections on the server behind a handle (0 if never resolved)
pub fn active_connections(handle: &CollectionHandle) -> usize {
    handle
        .client()
        .server()
        .map_or(0, |server| server.active_connections())
}
