//! File-backed stores across reopen.

use crate::common::*;
use nutriflow::{
    aggregate_fruits_by_family, get_all_fruits, summary_nutrition_total_fruit, Error,
    FAMILY_AGGREGATES_COLLECTION, NUTRITION_SUMMARY_COLLECTION,
};

#[test]
fn derived_collections_survive_reopen() {
    let (dir, uri) = file_store();
    let (summary, families) = {
        let fruits = CollectionHandle::resolve(&uri, DB, FRUITS);
        seed(&fruits, apple_pear_banana());
        (
            summary_nutrition_total_fruit(&fruits).unwrap(),
            aggregate_fruits_by_family(&fruits).unwrap(),
        )
    };

    // Server dropped with its last client; a fresh one reads the files.
    let reopened = CollectionHandle::resolve(&uri, DB, FRUITS);
    assert_eq!(read_all(&reopened.sibling(NUTRITION_SUMMARY_COLLECTION)), summary);
    assert_eq!(read_all(&reopened.sibling(FAMILY_AGGREGATES_COLLECTION)), families);
    assert_eq!(get_all_fruits(&reopened).unwrap().len(), 3);

    assert!(dir
        .path()
        .join(DB)
        .join(format!("{NUTRITION_SUMMARY_COLLECTION}.json"))
        .is_file());
}

#[test]
fn missing_root_is_unreachable() {
    let (dir, _) = file_store();
    let uri = format!("file://{}", dir.path().join("not-created").display());
    let fruits = CollectionHandle::resolve(&uri, DB, FRUITS);
    let err = get_all_fruits(&fruits).unwrap_err();
    assert!(matches!(err, Error::Unreachable { .. }));
}

#[test]
fn read_only_file_uri_denies_writes() {
    let (_dir, uri) = file_store();
    let writer = CollectionHandle::resolve(&uri, DB, FRUITS);
    seed(&writer, apple_pear_banana());
    summary_nutrition_total_fruit(&writer).unwrap();
    seed(&writer, vec![fruit("Kiwi", "Actinidiaceae", "Ericales", 61.0)]);

    let reader = CollectionHandle::resolve(&format!("{uri}?read_only=true"), DB, FRUITS);
    assert!(matches!(
        summary_nutrition_total_fruit(&reader).unwrap_err(),
        Error::PermissionDenied { .. }
    ));
    assert_eq!(get_all_fruits(&reader).unwrap().len(), 4);

    let stored = read_all(&writer.sibling(NUTRITION_SUMMARY_COLLECTION));
    assert_eq!(stored[0].get("total_fruits"), Some(&json!(3)));
    assert_eq!(active_connections(&writer), 0);
    assert_eq!(active_connections(&reader), 0);
}
