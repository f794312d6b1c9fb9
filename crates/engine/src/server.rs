//! Registered store instances
//!
//! A [`Server`] wraps one [`DocumentStore`] together with what a remote
//! document database would enforce at the connection boundary: optional
//! credentials, an online flag and a count of live connections.
//!
//! Servers are shared process-wide through [`OPEN_SERVERS`], keyed by
//! [`StoreUri::server_key`]. Opening the same target twice yields the same
//! server. The registry holds weak references, so a server is dropped together
//! with the last client that resolved it.

use crate::uri::{Credentials, StoreUri};
use nutriflow_core::{Error, Result};
use nutriflow_storage::{DocumentStore, FileStore, MemoryStore};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Global registry of open servers (server key -> weak reference)
///
/// Uses parking_lot::Mutex so a panic while holding the lock does not poison
/// every later connection attempt.
pub static OPEN_SERVERS: Lazy<Mutex<HashMap<String, Weak<Server>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// A store instance reachable through a connection URI
pub struct Server {
    key: String,
    store: Arc<dyn DocumentStore>,
    credentials: Option<Credentials>,
    online: AtomicBool,
    active: AtomicUsize,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("key", &self.key)
            .field("requires_auth", &self.credentials.is_some())
            .field("online", &self.is_online())
            .field("active_connections", &self.active_connections())
            .finish()
    }
}

impl Server {
    fn new(key: String, store: Arc<dyn DocumentStore>, credentials: Option<Credentials>) -> Self {
        Server {
            key,
            store,
            credentials,
            online: AtomicBool::new(true),
            active: AtomicUsize::new(0),
        }
    }

    /// Get or start the named in-memory server
    ///
    /// A server started this way accepts any credentials.
    pub fn memory(name: &str) -> Arc<Server> {
        let key = format!("memory://{name}");
        let mut servers = OPEN_SERVERS.lock();
        if let Some(existing) = servers.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        let server = Arc::new(Server::new(key.clone(), Arc::new(MemoryStore::new()), None));
        servers.insert(key, Arc::downgrade(&server));
        server
    }

    /// Start a named in-memory server that only accepts `credentials`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a server with that name is already running.
    pub fn memory_with_credentials(name: &str, credentials: Credentials) -> Result<Arc<Server>> {
        let key = format!("memory://{name}");
        let mut servers = OPEN_SERVERS.lock();
        if servers.get(&key).and_then(Weak::upgrade).is_some() {
            return Err(Error::invalid_config(format!(
                "server '{key}' is already running"
            )));
        }
        let server = Arc::new(Server::new(
            key.clone(),
            Arc::new(MemoryStore::new()),
            Some(credentials),
        ));
        servers.insert(key, Arc::downgrade(&server));
        Ok(server)
    }

    /// Resolve the server a URI points at, starting it if needed
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unreachable`] if a `file://` root does not exist.
    pub fn open(uri: &StoreUri) -> Result<Arc<Server>> {
        let key = uri.server_key();
        let mut servers = OPEN_SERVERS.lock();
        servers.retain(|_, weak| weak.strong_count() > 0);

        if let Some(existing) = servers.get(&key).and_then(Weak::upgrade) {
            return Ok(existing);
        }

        let store: Arc<dyn DocumentStore> = match uri {
            StoreUri::Memory { .. } => Arc::new(MemoryStore::new()),
            StoreUri::File { root, .. } => Arc::new(FileStore::open(root.clone())?),
        };
        debug!(server = %key, "started server");
        let server = Arc::new(Server::new(key.clone(), store, None));
        servers.insert(key, Arc::downgrade(&server));
        Ok(server)
    }

    /// Registry key (`memory://name` or `file://root`)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// False once [`Server::shutdown`] has been called
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Number of connections currently open against this server
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Take the server offline
    ///
    /// Clients that already resolved it become unable to connect; new clients
    /// for the same URI start a fresh server.
    pub fn shutdown(&self) {
        self.online.store(false, Ordering::Release);
        let mut servers = OPEN_SERVERS.lock();
        let is_self = servers
            .get(&self.key)
            .map_or(false, |weak| std::ptr::eq(weak.as_ptr(), self));
        if is_self {
            servers.remove(&self.key);
        }
        info!(server = %self.key, "server shut down");
    }

    pub(crate) fn authenticate(&self, presented: Option<&Credentials>) -> bool {
        match &self.credentials {
            None => true,
            Some(required) => presented == Some(required),
        }
    }

    pub(crate) fn acquire(&self) {
        self.active.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release(&self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
