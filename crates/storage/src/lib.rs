//! Storage layer for nutriflow
//!
//! This crate implements the document store the analytics layer talks to:
//! - DocumentStore: collection-scoped reads, bulk inserts, full-replace writes
//! - Filter / Projection: the read-side query language
//! - Pipeline: match, group, sort and project stages evaluated inside the store
//! - MemoryStore: process-local collections behind `parking_lot::RwLock`
//! - FileStore: one JSON file per collection, replaced by temp + rename
//!
//! # Full-replace writes
//!
//! Both backends build the complete new contents before publishing them, so a
//! reader sees either the previous collection or the new one, never a mix.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod file;
pub mod filter;
pub mod memory;
pub mod pipeline;
pub mod projection;
pub mod store;

pub use file::FileStore;
pub use filter::Filter;
pub use memory::MemoryStore;
pub use pipeline::{Accumulator, Group, GroupKey, Operand, Pipeline, SortKey, SortOrder, Stage};
pub use projection::Projection;
pub use store::{DocumentStore, Namespace};
