//! Staging blobs and loading them into raw collections.

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::common::*;
use nutriflow::{
    get_fruits_by_order, get_snacks_with_no_additives, load_blob, summary_nutrition_total_fruit,
    Bucket, Dataset, Error, NutriflowConfig, NutritionSummary,
};

const FRUITYVICE: &str = r#"[
  {"name":"Apple","id":6,"family":"Rosaceae","order":"Rosales","genus":"Malus",
   "nutritions":{"calories":52,"fat":0.4,"sugar":10.3,"carbohydrates":11.4,"protein":0.3}},
  {"name":"Banana","id":1,"family":"Musaceae","order":"Zingiberales","genus":"Musa",
   "nutritions":{"calories":96,"fat":0.2,"sugar":17.2,"carbohydrates":22,"protein":1}}
]"#;

const OPEN_FOOD_FACTS: &str = r#"{
  "count": 3, "page": 1, "page_size": 100,
  "products": [
    {"product_name":"Plain crisps","nutriscore_grade":"c","fat_100g":32,"sugars_100g":0.6,"additives_n":0},
    {"product_name":"Gummy bears","nutriscore_grade":"e","fat_100g":0.1,"sugars_100g":46,"additives_n":5},
    {"product_name":"Trail mix","nutriscore_grade":"b","fat_100g":30,"sugars_100g":20}
  ]
}"#;

#[test]
fn staged_blobs_load_into_configured_collections() {
    let buckets = TempDir::new().unwrap();
    let config = NutriflowConfig {
        uri: unique_memory_uri("ingest"),
        bucket_root: buckets.path().to_path_buf(),
        ..NutriflowConfig::default()
    };
    let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();

    for (dataset, blob) in [(Dataset::Fruit, FRUITYVICE), (Dataset::Snack, OPEN_FOOD_FACTS)] {
        let bucket =
            Bucket::open_or_create(&config.bucket_root, dataset.bucket_name(&config)).unwrap();
        bucket.put(&dataset.object_name(date), blob.as_bytes()).unwrap();
    }
    assert!(buckets
        .path()
        .join("fruit-data-dds-final-proj")
        .join("fruit_all")
        .join("2024-11-30.json")
        .is_file());

    let client = nutriflow::Client::new(config.uri.clone());
    let fruits = client.collection(&config.database, &config.fruit_collection);
    let snacks = client.collection(&config.database, &config.snack_collection);

    for (dataset, handle, expected) in [(Dataset::Fruit, &fruits, 2), (Dataset::Snack, &snacks, 3)] {
        let bucket =
            Bucket::open_or_create(&config.bucket_root, dataset.bucket_name(&config)).unwrap();
        let blob = bucket.get(&dataset.object_name(date)).unwrap();
        assert_eq!(load_blob(handle, &blob).unwrap(), expected);
    }

    let summary: NutritionSummary =
        summary_nutrition_total_fruit(&fruits).unwrap()[0].to_record().unwrap();
    assert_eq!(summary.total_fruits, 2);
    assert!((summary.avg_calories.unwrap() - 74.0).abs() < 1e-9);

    assert_eq!(get_fruits_by_order(&fruits, "Zingiberales").unwrap().len(), 1);
    let no_additives = get_snacks_with_no_additives(&snacks).unwrap();
    assert_eq!(no_additives.len(), 1);
    assert_eq!(no_additives[0].get_str("product_name"), Some("Plain crisps"));
}

#[test]
fn loader_failures_propagate() {
    let fruits = memory_fruits("bad-blob");
    let err = load_blob(&fruits, br#"[{"name":"Apple"}, "not an object"]"#).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument { .. }));
    assert!(read_all(&fruits).is_empty());

    let unreachable = CollectionHandle::resolve("ftp://nowhere", DB, FRUITS);
    assert!(load_blob(&unreachable, b"[]").unwrap_err().is_connection());
}
