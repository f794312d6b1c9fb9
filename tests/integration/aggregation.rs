//! Derived collections built through the public operations.

use crate::common::*;
use nutriflow::{
    aggregate_fruits_by_family, get_families_with_multiple_fruits, summary_nutrition_total_fruit,
    Error, FamilyAggregate, NutritionSummary, FAMILY_AGGREGATES_COLLECTION,
    NUTRITION_SUMMARY_COLLECTION,
};

#[test]
fn apple_pear_banana_family_example() {
    let fruits = memory_fruits("example");
    seed(&fruits, apple_pear_banana());

    let rows = aggregate_fruits_by_family(&fruits).unwrap();
    let families: Vec<FamilyAggregate> = rows.iter().map(|d| d.to_record().unwrap()).collect();
    assert_eq!(families.len(), 2);
    assert_eq!(families[0].family.as_deref(), Some("Rosaceae"));
    assert_eq!(families[0].count, 2);
    assert_eq!(families[0].fruits, vec!["Apple", "Pear"]);
    assert_eq!(families[1].family.as_deref(), Some("Musaceae"));
    assert_eq!(families[1].count, 1);
    assert_eq!(families[1].fruits, vec!["Banana"]);

    let derived = fruits.sibling(FAMILY_AGGREGATES_COLLECTION);
    let multiple = get_families_with_multiple_fruits(&derived).unwrap();
    assert_eq!(multiple.len(), 1);
    assert_eq!(multiple[0].id(), Some(&json!("Rosaceae")));
    assert_eq!(multiple[0].get("fruits"), Some(&json!(["Apple", "Pear"])));
}

#[test]
fn summary_matches_document_count_and_bounds() {
    let fruits = memory_fruits("summary");
    seed(&fruits, apple_pear_banana());

    let rows = summary_nutrition_total_fruit(&fruits).unwrap();
    assert_eq!(rows.len(), 1);
    let summary: NutritionSummary = rows[0].to_record().unwrap();
    assert_eq!(summary.total_fruits, 3);
    let avg = summary.avg_calories.unwrap();
    assert!((52.0..=89.0).contains(&avg));
    assert!((avg - 66.0).abs() < 1e-9);

    let stored = read_all(&fruits.sibling(NUTRITION_SUMMARY_COLLECTION));
    assert_eq!(stored, rows);
}

#[test]
fn empty_source_yields_zero_summary_and_no_families() {
    let fruits = memory_fruits("empty");

    let rows = summary_nutrition_total_fruit(&fruits).unwrap();
    let summary: NutritionSummary = rows[0].to_record().unwrap();
    assert_eq!(summary.total_fruits, 0);
    assert_eq!(summary.avg_calories, None);
    assert_eq!(summary.avg_carbs, None);

    assert!(aggregate_fruits_by_family(&fruits).unwrap().is_empty());
    let derived = fruits.sibling(FAMILY_AGGREGATES_COLLECTION);
    assert!(read_all(&derived).is_empty());
    assert!(get_families_with_multiple_fruits(&derived).unwrap().is_empty());
}

#[test]
fn rerunning_summary_is_byte_identical() {
    let fruits = memory_fruits("idempotent");
    seed(&fruits, apple_pear_banana());

    let first = summary_nutrition_total_fruit(&fruits).unwrap();
    let second = summary_nutrition_total_fruit(&fruits).unwrap();
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(read_all(&fruits.sibling(NUTRITION_SUMMARY_COLLECTION)).len(), 1);
}

#[test]
fn ties_keep_first_seen_order() {
    let fruits = memory_fruits("ties");
    seed(
        &fruits,
        vec![
            fruit("Lemon", "Rutaceae", "Sapindales", 29.0),
            fruit("Fig", "Moraceae", "Rosales", 74.0),
            fruit("Orange", "Rutaceae", "Sapindales", 47.0),
            fruit("Mulberry", "Moraceae", "Rosales", 43.0),
            fruit("Kiwi", "Actinidiaceae", "Ericales", 61.0),
        ],
    );
    let rows = aggregate_fruits_by_family(&fruits).unwrap();
    let ids: Vec<_> = rows.iter().filter_map(|d| d.get_str("_id")).collect();
    assert_eq!(ids, vec!["Rutaceae", "Moraceae", "Actinidiaceae"]);
}

#[test]
fn connections_are_released_on_success_and_failure() {
    let fruits = memory_fruits("leaks");
    seed(&fruits, apple_pear_banana());
    summary_nutrition_total_fruit(&fruits).unwrap();
    aggregate_fruits_by_family(&fruits).unwrap();
    assert_eq!(active_connections(&fruits), 0);

    let uri = format!(
        "{}?read_only=true",
        fruits.client().server().unwrap().key()
    );
    let reader = CollectionHandle::resolve(&uri, DB, FRUITS);
    let err = aggregate_fruits_by_family(&reader).unwrap_err();
    assert!(matches!(err, Error::PermissionDenied { .. }));
    assert_eq!(active_connections(&reader), 0);
    assert_eq!(active_connections(&fruits), 0);
}

#[test]
fn connection_failures_are_distinct_from_empty_results() {
    let unreachable = CollectionHandle::resolve("mongodb+srv://user:pw@cluster/db", DB, FRUITS);
    let err = summary_nutrition_total_fruit(&unreachable).unwrap_err();
    assert!(err.is_connection());
    assert!(!err.to_string().contains(":pw@"));
}
