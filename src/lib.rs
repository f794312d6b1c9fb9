//! Nutriflow - aggregation and query layer over staged nutrition datasets
//!
//! Raw fruit (Fruityvice) and snack (Open Food Facts) records are staged as
//! dated JSON blobs, bulk-loaded into a document store, summarized into
//! derived collections, and queried back as plain documents.
//!
//! # Quick Start
//!
//! ```ignore
//! use nutriflow::{summary_nutrition_total_fruit, get_fruits_by_order, CollectionHandle};
//!
//! let fruits = CollectionHandle::resolve("file://.nutriflow", "nutrition", "fruit-data-collection");
//!
//! // Rebuild fruit-nutrition-summary and get the row back
//! let summary = summary_nutrition_total_fruit(&fruits)?;
//!
//! // Rosales fruits as {name, family, order}
//! let rosales = get_fruits_by_order(&fruits, "Rosales")?;
//! ```
//!
//! # Architecture
//!
//! - `nutriflow-core`: documents, field paths, typed records, errors
//! - `nutriflow-storage`: the document store trait, memory and file backends,
//!   filters, projections and the pipeline evaluator
//! - `nutriflow-engine`: connection URIs, servers, clients, handles,
//!   configuration, bucket staging and loading
//! - `nutriflow-analytics`: the aggregations and queries

pub use nutriflow_analytics::*;
pub use nutriflow_core::{
    json, Document, Error, ErrorKind, FamilyAggregate, FieldPath, FruitRecord, Nutritions,
    NutritionSummary, Result, SnackRecord, Value,
};
pub use nutriflow_engine::{
    dated_object_name, load_blob, load_documents, parse_blob, Bucket, Client, CollectionHandle,
    Connection, Credentials, Dataset, NutriflowConfig, Server, StoreUri, CONFIG_FILE_NAME,
};
pub use nutriflow_storage::{DocumentStore, FileStore, Filter, MemoryStore, Namespace, Projection};
