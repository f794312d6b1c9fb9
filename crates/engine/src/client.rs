//! Lazy clients and scoped connections
//!
//! [`Client::new`] only records the URI. The first [`Client::connect`] parses
//! it, resolves the server and checks credentials; any failure there is a
//! connection error reported to that caller. A resolved server is then kept
//! by the client for later connections.
//!
//! A [`Connection`] counts against its server until dropped. Operations open
//! one connection each and let it drop at the end of the call, which also
//! covers early returns through `?`.

use crate::handle::CollectionHandle;
use crate::server::Server;
use crate::uri::{redact, StoreUri};
use nutriflow_core::{Document, Error, Result};
use nutriflow_storage::{Filter, Namespace, Pipeline, Projection};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, warn};

struct ClientInner {
    uri: String,
    server: OnceCell<Arc<Server>>,
}

/// Handle on a connection target; cheap to clone
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("uri", &redact(&self.inner.uri))
            .field("resolved", &self.inner.server.get().is_some())
            .finish()
    }
}

impl Client {
    /// Record a connection URI without validating it
    pub fn new(uri: impl Into<String>) -> Self {
        Client {
            inner: Arc::new(ClientInner {
                uri: uri.into(),
                server: OnceCell::new(),
            }),
        }
    }

    /// The URI with any password replaced by `***`
    pub fn redacted_uri(&self) -> String {
        redact(&self.inner.uri)
    }

    /// Handle on `database.collection` through this client
    pub fn collection(&self, database: &str, collection: &str) -> CollectionHandle {
        CollectionHandle::new(self.clone(), Namespace::new(database, collection))
    }

    /// The server this client resolved, if it has connected before
    pub fn server(&self) -> Option<Arc<Server>> {
        self.inner.server.get().cloned()
    }

    /// Open a scoped connection
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unreachable`] if the URI is malformed, the target does
    /// not exist or the server is shut down, and [`Error::AuthenticationFailed`]
    /// if the server rejects the presented credentials.
    pub fn connect(&self) -> Result<Connection> {
        let target = self.redacted_uri();
        let uri = StoreUri::parse(&self.inner.uri)?;
        let server = self
            .inner
            .server
            .get_or_try_init(|| Server::open(&uri))?
            .clone();

        if !server.is_online() {
            return Err(Error::unreachable(target, "server is shut down"));
        }

        let presented = match &uri {
            StoreUri::Memory { credentials, .. } => credentials.as_ref(),
            StoreUri::File { .. } => None,
        };
        if !server.authenticate(presented) {
            warn!(target = %target, "credentials rejected");
            return Err(Error::AuthenticationFailed { target });
        }

        debug!(target = %target, read_only = uri.read_only(), "connection opened");
        Ok(Connection::new(server, uri.read_only(), target))
    }
}

/// A live connection; released when dropped
pub struct Connection {
    server: Arc<Server>,
    read_only: bool,
    target: String,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("read_only", &self.read_only)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Connection {
    fn new(server: Arc<Server>, read_only: bool, target: String) -> Self {
        server.acquire();
        Connection {
            server,
            read_only,
            target,
        }
    }

    /// True if writes are denied on this connection
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Server this connection is attached to
    pub fn server(&self) -> &Arc<Server> {
        &self.server
    }

    fn ensure_online(&self) -> Result<()> {
        if self.server.is_online() {
            Ok(())
        } else {
            Err(Error::unreachable(self.target.clone(), "server is shut down"))
        }
    }

    fn ensure_writable(&self, operation: &str, ns: &Namespace) -> Result<()> {
        self.ensure_online()?;
        if self.read_only {
            return Err(Error::PermissionDenied {
                operation: operation.to_string(),
                namespace: ns.to_string(),
            });
        }
        Ok(())
    }

    /// Filtered, projected read
    ///
    /// # Errors
    ///
    /// Returns an error if the server is down or the store cannot be read.
    pub fn find(&self, ns: &Namespace, filter: &Filter, projection: &Projection) -> Result<Vec<Document>> {
        self.ensure_online()?;
        self.server.store().find(ns, filter, projection)
    }

    /// Evaluate a pipeline inside the store
    ///
    /// # Errors
    ///
    /// Returns an error if the server is down, the pipeline is malformed, or
    /// the store cannot be read.
    pub fn aggregate(&self, ns: &Namespace, pipeline: &Pipeline) -> Result<Vec<Document>> {
        self.ensure_online()?;
        self.server.store().aggregate(ns, pipeline)
    }

    /// Number of documents in a collection
    ///
    /// # Errors
    ///
    /// Returns an error if the server is down or the store cannot be read.
    pub fn count(&self, ns: &Namespace) -> Result<usize> {
        self.ensure_online()?;
        self.server.store().count(ns)
    }

    /// True if the collection exists on the server
    ///
    /// # Errors
    ///
    /// Returns an error if the server is down or the store cannot be listed.
    pub fn collection_exists(&self, ns: &Namespace) -> Result<bool> {
        self.ensure_online()?;
        self.server.store().collection_exists(ns)
    }

    /// Append documents
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] on a read-only connection, or the
    /// store's error if the write fails.
    pub fn insert_many(&self, ns: &Namespace, docs: Vec<Document>) -> Result<usize> {
        self.ensure_writable("insert", ns)?;
        self.server.store().insert_many(ns, docs)
    }

    /// Replace a collection's contents
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] on a read-only connection, or the
    /// store's error if the write fails.
    pub fn replace_collection(&self, ns: &Namespace, docs: Vec<Document>) -> Result<()> {
        self.ensure_writable("replace", ns)?;
        self.server.store().replace_collection(ns, docs)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.server.release();
    }
}
