//! Document filters
//!
//! A [`Filter`] selects documents by field value. A field that is missing from
//! a document never satisfies [`Filter::Eq`] or [`Filter::Gt`]; in particular a
//! missing field is not treated as zero or null.

use crate::compare::{compare_values, same_type_class, values_equal};
use nutriflow_core::{Document, FieldPath, Result};
use serde_json::Value;
use std::cmp::Ordering;

/// Predicate over documents
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    /// Matches every document
    #[default]
    All,
    /// Field exists and equals the value (numbers compare by value)
    Eq(FieldPath, Value),
    /// Field exists, has the same type class, and is strictly greater
    Gt(FieldPath, Value),
    /// Field exists (an explicit null counts as present)
    Exists(FieldPath),
    /// Every sub-filter matches
    And(Vec<Filter>),
}

impl Filter {
    /// `path == value`
    ///
    /// # Errors
    ///
    /// Returns [`nutriflow_core::Error::InvalidPath`] if `path` does not parse.
    pub fn eq(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Filter::Eq(FieldPath::parse(path)?, value.into()))
    }

    /// `path > value`
    ///
    /// # Errors
    ///
    /// Returns [`nutriflow_core::Error::InvalidPath`] if `path` does not parse.
    pub fn gt(path: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Filter::Gt(FieldPath::parse(path)?, value.into()))
    }

    /// `path` is present
    ///
    /// # Errors
    ///
    /// Returns [`nutriflow_core::Error::InvalidPath`] if `path` does not parse.
    pub fn exists(path: &str) -> Result<Self> {
        Ok(Filter::Exists(FieldPath::parse(path)?))
    }

    /// Evaluate against a document
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(path, expected) => doc
                .get_path(path)
                .map_or(false, |actual| values_equal(actual, expected)),
            Filter::Gt(path, bound) => doc.get_path(path).map_or(false, |actual| {
                same_type_class(actual, bound)
                    && compare_values(actual, bound) == Ordering::Greater
            }),
            Filter::Exists(path) => doc.get_path(path).is_some(),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn eq_is_exact_and_case_sensitive() {
        let filter = Filter::eq("order", "Rosales").unwrap();
        assert!(filter.matches(&doc(json!({"order": "Rosales"}))));
        assert!(!filter.matches(&doc(json!({"order": "rosales"}))));
        assert!(!filter.matches(&doc(json!({"order": "Rosales "}))));
        assert!(!filter.matches(&doc(json!({"name": "Apple"}))));
    }

    #[test]
    fn eq_zero_excludes_missing_and_null() {
        let filter = Filter::eq("additives_n", 0).unwrap();
        assert!(filter.matches(&doc(json!({"additives_n": 0}))));
        assert!(filter.matches(&doc(json!({"additives_n": 0.0}))));
        assert!(!filter.matches(&doc(json!({"additives_n": 2}))));
        assert!(!filter.matches(&doc(json!({"additives_n": null}))));
        assert!(!filter.matches(&doc(json!({"product_name": "Crisps"}))));
    }

    #[test]
    fn gt_requires_same_type_class() {
        let filter = Filter::gt("count", 1).unwrap();
        assert!(filter.matches(&doc(json!({"count": 2}))));
        assert!(filter.matches(&doc(json!({"count": 1.5}))));
        assert!(!filter.matches(&doc(json!({"count": 1}))));
        assert!(!filter.matches(&doc(json!({"count": "9"}))));
        assert!(!filter.matches(&doc(json!({"count": null}))));
    }

    #[test]
    fn nested_paths_and_conjunction() {
        let filter = Filter::And(vec![
            Filter::exists("nutritions.sugar").unwrap(),
            Filter::gt("nutritions.calories", 50).unwrap(),
        ]);
        assert!(filter.matches(&doc(json!({"nutritions": {"sugar": 1, "calories": 52}}))));
        assert!(!filter.matches(&doc(json!({"nutritions": {"calories": 52}}))));
        assert!(Filter::And(vec![]).matches(&doc(json!({}))));
    }

    #[test]
    fn bad_path_is_rejected() {
        assert!(Filter::eq("a..b", 1).is_err());
    }
}
