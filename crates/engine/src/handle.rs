//! Collection handles
//!
//! A [`CollectionHandle`] is the explicit (client, database, collection)
//! triple every analytics operation takes. It holds no connection of its own;
//! each call opens one through the client and drops it before returning.

use crate::client::{Client, Connection};
use nutriflow_core::Result;
use nutriflow_storage::Namespace;

/// Client plus the namespace an operation works on
#[derive(Debug, Clone)]
pub struct CollectionHandle {
    client: Client,
    namespace: Namespace,
}

impl CollectionHandle {
    /// Build a handle from a URI and names
    ///
    /// Never fails: the URI is only checked when a connection is opened.
    pub fn resolve(uri: &str, database: &str, collection: &str) -> Self {
        Client::new(uri).collection(database, collection)
    }

    /// Build a handle on an existing client
    pub fn new(client: Client, namespace: Namespace) -> Self {
        CollectionHandle { client, namespace }
    }

    /// Target namespace
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Database name
    pub fn database(&self) -> &str {
        &self.namespace.database
    }

    /// Collection name
    pub fn collection(&self) -> &str {
        &self.namespace.collection
    }

    /// Client the handle connects through
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Handle on another collection of the same database, sharing the client
    pub fn sibling(&self, collection: &str) -> Self {
        CollectionHandle {
            client: self.client.clone(),
            namespace: self.namespace.sibling(collection),
        }
    }

    /// Open a scoped connection through the client
    ///
    /// # Errors
    ///
    /// Returns a connection error if the target cannot be reached or rejects
    /// the credentials.
    pub fn connect(&self) -> Result<Connection> {
        self.client.connect()
    }
}
