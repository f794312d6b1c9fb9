//! Read-only queries over raw collections.

use crate::common::*;
use nutriflow::{get_all_fruits, get_fruits_by_order, get_snacks_with_no_additives, SnackRecord};

#[test]
fn fruits_by_order_returns_only_that_order_and_fields() {
    let fruits = memory_fruits("order");
    seed(&fruits, apple_pear_banana());

    let rosales = get_fruits_by_order(&fruits, "Rosales").unwrap();
    assert_eq!(rosales.len(), 2);
    for doc in &rosales {
        assert_eq!(doc.get_str("order"), Some("Rosales"));
        let mut keys: Vec<_> = doc.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["family", "name", "order"]);
    }

    assert!(get_fruits_by_order(&fruits, "rosales").unwrap().is_empty());
}

#[test]
fn all_fruits_reflect_current_state() {
    let fruits = memory_fruits("all");
    assert!(get_all_fruits(&fruits).unwrap().is_empty());

    seed(&fruits, apple_pear_banana());
    assert_eq!(get_all_fruits(&fruits).unwrap().len(), 3);

    seed(&fruits, vec![fruit("Kiwi", "Actinidiaceae", "Ericales", 61.0)]);
    let names: Vec<_> = get_all_fruits(&fruits)
        .unwrap()
        .iter()
        .filter_map(|d| d.get_str("name").map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Apple", "Pear", "Banana", "Kiwi"]);
}

#[test]
fn missing_fields_are_not_synthesized() {
    let fruits = memory_fruits("sparse");
    seed(
        &fruits,
        vec![Document::from_value(json!({"name": "Mystery", "order": "Rosales"})).unwrap()],
    );
    let rows = get_fruits_by_order(&fruits, "Rosales").unwrap();
    assert_eq!(rows, vec![Document::from_value(json!({"name": "Mystery", "order": "Rosales"})).unwrap()]);
}

#[test]
fn snacks_with_no_additives_exclude_missing_and_nonzero() {
    let snacks = CollectionHandle::resolve(&unique_memory_uri("snacks"), DB, SNACKS);
    seed(
        &snacks,
        vec![
            Document::from_value(json!({"product_name": "Rice cakes", "nutriscore_grade": "a", "fat_100g": 2.8, "additives_n": 0, "sugars_100g": 0.5})).unwrap(),
            Document::from_value(json!({"product_name": "Cookies", "nutriscore_grade": "e", "fat_100g": 22, "additives_n": 4})).unwrap(),
            Document::from_value(json!({"product_name": "Unknown", "fat_100g": 9})).unwrap(),
            Document::from_value(json!({"product_name": "Nuts", "nutriscore_grade": "b", "fat_100g": 50.0, "additives_n": 0.0})).unwrap(),
        ],
    );

    let rows = get_snacks_with_no_additives(&snacks).unwrap();
    let records: Vec<SnackRecord> = rows.iter().map(|d| d.to_record().unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].product_name.as_deref(), Some("Rice cakes"));
    assert_eq!(records[1].product_name.as_deref(), Some("Nuts"));
    assert!(records.iter().all(|r| r.additives_n.is_none()));
    assert!(rows.iter().all(|d| !d.contains("sugars_100g") && d.id().is_none()));
}
