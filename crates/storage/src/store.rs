//! Document store abstraction
//!
//! [`DocumentStore`] is the seam between the analytics layer and whatever holds
//! the collections. Backends supply four primitives (snapshot, bulk insert,
//! full replace, listing); reads, counts and pipelines are evaluated on top of
//! a snapshot so every backend answers them the same way.
//!
//! Thread safety: all methods must be safe to call concurrently from multiple
//! threads (requires Send + Sync).

use crate::filter::Filter;
use crate::pipeline::Pipeline;
use crate::projection::Projection;
use nutriflow_core::{Document, Result};
use std::fmt;
use std::sync::Arc;

/// Fully qualified collection name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
}

impl Namespace {
    /// Create a namespace
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Namespace {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Another collection in the same database
    pub fn sibling(&self, collection: impl Into<String>) -> Self {
        Namespace::new(self.database.clone(), collection)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Collection-scoped document storage
pub trait DocumentStore: Send + Sync {
    /// Current contents of a collection, `None` if it does not exist
    ///
    /// The returned vector is immutable; later writes never change it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn snapshot(&self, ns: &Namespace) -> Result<Option<Arc<Vec<Document>>>>;

    /// Append documents, creating the collection if needed
    ///
    /// Returns the number of documents inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write; nothing is inserted then.
    fn insert_many(&self, ns: &Namespace, docs: Vec<Document>) -> Result<usize>;

    /// Discard the collection's contents and publish `docs` in their place
    ///
    /// Readers observe either the old or the new contents, never a mix.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write; the old contents
    /// remain visible then.
    fn replace_collection(&self, ns: &Namespace, docs: Vec<Document>) -> Result<()>;

    /// Collection names in a database, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be listed.
    fn list_collections(&self, database: &str) -> Result<Vec<String>>;

    /// Filtered, projected read; absent collections read as empty
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be taken.
    fn find(&self, ns: &Namespace, filter: &Filter, projection: &Projection) -> Result<Vec<Document>> {
        let Some(docs) = self.snapshot(ns)? else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .map(|doc| projection.apply(doc))
            .collect())
    }

    /// Evaluate a pipeline over a collection; absent collections read as empty
    ///
    /// # Errors
    ///
    /// Returns [`nutriflow_core::Error::InvalidPipeline`] for malformed
    /// pipelines, or an error if the snapshot cannot be taken.
    fn aggregate(&self, ns: &Namespace, pipeline: &Pipeline) -> Result<Vec<Document>> {
        pipeline.validate()?;
        match self.snapshot(ns)? {
            Some(docs) => pipeline.execute(&docs),
            None => pipeline.execute(&[]),
        }
    }

    /// Number of documents in a collection (0 if absent)
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be taken.
    fn count(&self, ns: &Namespace) -> Result<usize> {
        Ok(self.snapshot(ns)?.map_or(0, |docs| docs.len()))
    }

    /// True if the collection exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be listed.
    fn collection_exists(&self, ns: &Namespace) -> Result<bool> {
        Ok(self
            .list_collections(&ns.database)?
            .iter()
            .any(|name| *name == ns.collection))
    }
}
