//! Derived collections
//!
//! Both aggregations run their pipeline inside the store against the raw fruit
//! collection, then publish the result set to a sibling collection in the same
//! database. The publish is a full replacement: readers of the derived
//! collection see either the previous rows or the new ones. Two concurrent
//! runs against the same target leave whichever finished last.

use nutriflow_core::{json, Document, FieldPath, Result, ID_FIELD};
use nutriflow_engine::CollectionHandle;
use nutriflow_storage::{Accumulator, Group, Operand, Pipeline, SortKey};
use tracing::info;

/// Collection receiving the single nutrition summary row
pub const NUTRITION_SUMMARY_COLLECTION: &str = "fruit-nutrition-summary";

/// Collection receiving one row per fruit family
pub const FAMILY_AGGREGATES_COLLECTION: &str = "fruit-family-aggregates";

/// (output field, source path) pairs averaged by the nutrition summary
const AVERAGED_FIELDS: [(&str, &str); 5] = [
    ("avg_calories", "nutritions.calories"),
    ("avg_fat", "nutritions.fat"),
    ("avg_sugar", "nutritions.sugar"),
    ("avg_carbs", "nutritions.carbohydrates"),
    ("avg_protein", "nutritions.protein"),
];

/// Whole-collection group averaging each nutrition field and counting fruits
///
/// # Errors
///
/// Only fails if a built-in path does not parse.
pub fn nutrition_summary_pipeline() -> Result<Pipeline> {
    let mut group = Group::whole();
    for (output, source) in AVERAGED_FIELDS {
        group = group.field(output, Accumulator::Avg(FieldPath::parse(source)?));
    }
    group = group.field("total_fruits", Accumulator::Sum(Operand::Constant(json!(1))));
    Ok(Pipeline::new().group(group))
}

/// Group by family, largest families first
///
/// # Errors
///
/// Only fails if a built-in path does not parse.
pub fn family_aggregates_pipeline() -> Result<Pipeline> {
    let group = Group::by("family")?
        .field("count", Accumulator::Sum(Operand::Constant(json!(1))))
        .field("fruits", Accumulator::Push(FieldPath::parse("name")?))
        .field("orders", Accumulator::AddToSet(FieldPath::parse("order")?));
    Ok(Pipeline::new()
        .group(group)
        .sort(vec![SortKey::descending("count")?]))
}

/// Summary row for a collection with no fruits
fn empty_summary() -> Document {
    let mut row = Document::new().with(ID_FIELD, json!(null));
    for (output, _) in AVERAGED_FIELDS {
        row.insert(output, json!(null));
    }
    row.with("total_fruits", 0)
}

/// Run `pipeline` over the handle's collection and publish the rows to the
/// sibling collection `target`, all on one connection.
fn aggregate_into<F>(
    handle: &CollectionHandle,
    pipeline: &Pipeline,
    target: &str,
    finish: F,
) -> Result<Vec<Document>>
where
    F: FnOnce(&mut Vec<Document>),
{
    let conn = handle.connect()?;
    let mut rows = conn.aggregate(handle.namespace(), pipeline)?;
    finish(&mut rows);

    let target = handle.namespace().sibling(target);
    conn.replace_collection(&target, rows.clone())?;
    info!(
        source = %handle.namespace(),
        target = %target,
        rows = rows.len(),
        "replaced derived collection"
    );
    Ok(rows)
}

/// Average each nutrition field over the fruit collection and count fruits
///
/// Fruits missing a field, or holding a non-numeric value, are left out of
/// that field's average only. An empty collection yields `total_fruits = 0`
/// with null averages. The single row replaces the contents of
/// [`NUTRITION_SUMMARY_COLLECTION`] and is returned.
///
/// # Errors
///
/// Connection failures and a denied or failed write propagate; on failure the
/// previous summary stays in place.
pub fn summary_nutrition_total_fruit(handle: &CollectionHandle) -> Result<Vec<Document>> {
    let pipeline = nutrition_summary_pipeline()?;
    aggregate_into(handle, &pipeline, NUTRITION_SUMMARY_COLLECTION, |rows| {
        if rows.is_empty() {
            rows.push(empty_summary());
        }
    })
}

/// Group fruits by family with member names and distinct orders
///
/// Rows are sorted by `count` descending; families of equal size keep the
/// order in which they were first seen. The rows replace the contents of
/// [`FAMILY_AGGREGATES_COLLECTION`] and are returned.
///
/// # Errors
///
/// Connection failures and a denied or failed write propagate; on failure the
/// previous aggregates stay in place.
pub fn aggregate_fruits_by_family(handle: &CollectionHandle) -> Result<Vec<Document>> {
    let pipeline = family_aggregates_pipeline()?;
    aggregate_into(handle, &pipeline, FAMILY_AGGREGATES_COLLECTION, |_| {})
}
