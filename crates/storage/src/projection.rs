//! Inclusion projections
//!
//! A [`Projection`] keeps a fixed set of top-level fields. `_id` is kept unless
//! explicitly excluded. Fields absent from the source document are absent from
//! the projected document.

use nutriflow_core::{Document, ID_FIELD};

/// Which top-level fields a query returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Option<Vec<String>>,
    include_id: bool,
}

impl Projection {
    /// Return documents unchanged
    pub fn all() -> Self {
        Projection {
            fields: None,
            include_id: true,
        }
    }

    /// Keep only the named fields (plus `_id`)
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            include_id: true,
        }
    }

    /// Drop `_id` from the output
    pub fn without_id(mut self) -> Self {
        self.include_id = false;
        self
    }

    /// Apply to a document
    pub fn apply(&self, doc: &Document) -> Document {
        let mut out = match &self.fields {
            None => doc.clone(),
            Some(fields) => {
                let mut out = Document::new();
                for field in fields {
                    if let Some(value) = doc.get(field) {
                        out.insert(field.clone(), value.clone());
                    }
                }
                if self.include_id {
                    if let Some(id) = doc.id() {
                        out.insert(ID_FIELD, id.clone());
                    }
                }
                out
            }
        };

        if !self.include_id {
            let mut stripped = Document::new();
            for (key, value) in out.as_map() {
                if key != ID_FIELD {
                    stripped.insert(key.clone(), value.clone());
                }
            }
            out = stripped;
        }
        out
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fruit() -> Document {
        Document::from_value(json!({
            "_id": "f-1",
            "name": "Apple",
            "family": "Rosaceae",
            "order": "Rosales",
            "genus": "Malus",
            "nutritions": {"calories": 52}
        }))
        .unwrap()
    }

    #[test]
    fn include_without_id() {
        let projection = Projection::include(["name", "family", "order"]).without_id();
        let out = projection.apply(&fruit());
        assert_eq!(
            out.into_value(),
            json!({"name": "Apple", "family": "Rosaceae", "order": "Rosales"})
        );
    }

    #[test]
    fn include_keeps_id_by_default() {
        let projection = Projection::include(["name"]);
        let out = projection.apply(&fruit());
        assert_eq!(out.into_value(), json!({"_id": "f-1", "name": "Apple"}));
    }

    #[test]
    fn missing_fields_stay_missing() {
        let projection = Projection::include(["name", "fat_100g"]).without_id();
        let out = projection.apply(&fruit());
        assert_eq!(out.len(), 1);
        assert!(!out.contains("fat_100g"));
    }

    #[test]
    fn all_is_identity_unless_id_excluded() {
        assert_eq!(Projection::all().apply(&fruit()), fruit());
        let out = Projection::all().without_id().apply(&fruit());
        assert!(out.id().is_none());
        assert_eq!(out.len(), 5);
    }
}
