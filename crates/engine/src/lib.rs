//! Connection engine for nutriflow
//!
//! This crate turns caller-supplied connection parameters into usable handles:
//! - StoreUri: `memory://` and `file://` connection targets
//! - Server: a registered store instance with credentials and connection accounting
//! - Client: lazy client; nothing is resolved until the first connection
//! - Connection: scoped guard released on drop, on every exit path
//! - CollectionHandle: (client, database, collection) triple passed to operations
//! - NutriflowConfig: `nutriflow.toml` plus environment overrides
//! - ingest: bucket staging and bulk loading of raw collections

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod handle;
pub mod ingest;
pub mod server;
pub mod uri;

pub use client::{Client, Connection};
pub use config::{NutriflowConfig, CONFIG_FILE_NAME};
pub use handle::CollectionHandle;
pub use ingest::{dated_object_name, load_blob, load_documents, parse_blob, Bucket, Dataset};
pub use server::{Server, OPEN_SERVERS};
pub use uri::{Credentials, StoreUri};
