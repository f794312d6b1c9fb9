//! Aggregations and queries over the nutrition collections
//!
//! Every operation takes an explicit [`CollectionHandle`], opens one scoped
//! connection, and returns plain documents:
//! - aggregate: nutrition summary and family aggregates, each persisted to a
//!   derived collection by full replacement
//! - query: filtered, projected reads of raw and derived collections
//!
//! [`CollectionHandle`]: nutriflow_engine::CollectionHandle

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod query;

pub use aggregate::{
    aggregate_fruits_by_family, family_aggregates_pipeline, nutrition_summary_pipeline,
    summary_nutrition_total_fruit, FAMILY_AGGREGATES_COLLECTION, NUTRITION_SUMMARY_COLLECTION,
};
pub use query::{
    get_all_fruits, get_families_with_multiple_fruits, get_fruits_by_order,
    get_snacks_with_no_additives,
};
