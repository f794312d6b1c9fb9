//! Core types for nutriflow
//!
//! This crate defines the foundational types shared by every layer:
//! - Document: a schemaless JSON object as stored in a collection
//! - FieldPath: dotted path into a document (`nutritions.calories`)
//! - Records: typed views over raw and derived documents
//! - Error: error taxonomy split into connection and operation failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod path;
pub mod records;

pub use document::{Document, ID_FIELD};
pub use error::{Error, ErrorKind, Result};
pub use path::{FieldPath, PathParseError};
pub use records::{FamilyAggregate, FruitRecord, Nutritions, NutritionSummary, SnackRecord};

/// Re-exported so downstream crates build values without naming serde_json directly.
pub use serde_json::{json, Map, Value};
