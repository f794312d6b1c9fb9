//! Read-only queries
//!
//! Each query is one filtered, projected `find` on the handle's collection,
//! evaluated at call time. No match is an empty `Vec`, never an error.

use nutriflow_core::{Document, Result};
use nutriflow_engine::CollectionHandle;
use nutriflow_storage::{Filter, Projection};

const FRUIT_FIELDS: [&str; 3] = ["name", "family", "order"];
const SNACK_FIELDS: [&str; 3] = ["product_name", "nutriscore_grade", "fat_100g"];
const FAMILY_FIELDS: [&str; 2] = ["count", "fruits"];

fn find(handle: &CollectionHandle, filter: &Filter, projection: &Projection) -> Result<Vec<Document>> {
    let conn = handle.connect()?;
    conn.find(handle.namespace(), filter, projection)
}

/// Every fruit as `{name, family, order}`
///
/// # Errors
///
/// Returns a connection error if the store cannot be reached.
pub fn get_all_fruits(handle: &CollectionHandle) -> Result<Vec<Document>> {
    find(handle, &Filter::All, &Projection::include(FRUIT_FIELDS).without_id())
}

/// Fruits whose `order` is exactly `order`, as `{name, family, order}`
///
/// # Errors
///
/// Returns a connection error if the store cannot be reached.
pub fn get_fruits_by_order(handle: &CollectionHandle, order: &str) -> Result<Vec<Document>> {
    let filter = Filter::eq("order", order)?;
    find(handle, &filter, &Projection::include(FRUIT_FIELDS).without_id())
}

/// Snacks with `additives_n == 0`, as `{product_name, nutriscore_grade, fat_100g}`
///
/// Snacks without an `additives_n` field are excluded.
///
/// # Errors
///
/// Returns a connection error if the store cannot be reached.
pub fn get_snacks_with_no_additives(handle: &CollectionHandle) -> Result<Vec<Document>> {
    let filter = Filter::eq("additives_n", 0)?;
    find(handle, &filter, &Projection::include(SNACK_FIELDS).without_id())
}

/// Family aggregate rows with `count > 1`, as `{_id, count, fruits}`
///
/// The handle points at the derived family collection. A collection that was
/// never aggregated reads as empty.
///
/// # Errors
///
/// Returns a connection error if the store cannot be reached.
pub fn get_families_with_multiple_fruits(handle: &CollectionHandle) -> Result<Vec<Document>> {
    let filter = Filter::gt("count", 1)?;
    find(handle, &filter, &Projection::include(FAMILY_FIELDS))
}
