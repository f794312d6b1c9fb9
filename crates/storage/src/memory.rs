//! MemoryStore: process-local collections
//!
//! Each collection is an `Arc<Vec<Document>>` behind a single
//! `parking_lot::RwLock`. Readers clone the `Arc` and release the lock, so a
//! snapshot is never affected by later writes:
//! - `insert_many` copies on write when a snapshot is still alive
//! - `replace_collection` builds the new vector outside the lock and swaps the
//!   `Arc` in one assignment

use crate::store::{DocumentStore, Namespace};
use nutriflow_core::{Document, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Collections = HashMap<String, Arc<Vec<Document>>>;

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: RwLock<HashMap<String, Collections>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn snapshot(&self, ns: &Namespace) -> Result<Option<Arc<Vec<Document>>>> {
        let databases = self.databases.read();
        Ok(databases
            .get(&ns.database)
            .and_then(|collections| collections.get(&ns.collection))
            .cloned())
    }

    fn insert_many(&self, ns: &Namespace, docs: Vec<Document>) -> Result<usize> {
        let inserted = docs.len();
        let mut databases = self.databases.write();
        let collection = databases
            .entry(ns.database.clone())
            .or_default()
            .entry(ns.collection.clone())
            .or_default();
        Arc::make_mut(collection).extend(docs);
        Ok(inserted)
    }

    fn replace_collection(&self, ns: &Namespace, docs: Vec<Document>) -> Result<()> {
        let contents = Arc::new(docs);
        let mut databases = self.databases.write();
        databases
            .entry(ns.database.clone())
            .or_default()
            .insert(ns.collection.clone(), contents);
        Ok(())
    }

    fn list_collections(&self, database: &str) -> Result<Vec<String>> {
        let databases = self.databases.read();
        let mut names: Vec<String> = databases
            .get(database)
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }
}
