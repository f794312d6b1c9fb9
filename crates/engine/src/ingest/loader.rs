//! Bulk loading into raw collections

use crate::handle::CollectionHandle;
use nutriflow_core::{Document, Error, Result, Value};
use tracing::info;

/// Key holding the document list in an Open Food Facts search response
const PRODUCTS_KEY: &str = "products";

/// Parse a staged blob into documents
///
/// Accepts a JSON array of objects (Fruityvice) or an object with a
/// `products` array (Open Food Facts).
///
/// # Errors
///
/// Returns [`Error::Serialization`] for malformed JSON and
/// [`Error::InvalidDocument`] for any other shape or a non-object entry.
pub fn parse_blob(bytes: &[u8]) -> Result<Vec<Document>> {
    let value: Value = serde_json::from_slice(bytes)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(PRODUCTS_KEY) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::invalid_document(format!(
                    "expected a JSON array or an object with a '{PRODUCTS_KEY}' array"
                )))
            }
        },
        _ => {
            return Err(Error::invalid_document(
                "expected a JSON array or an object with a 'products' array",
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Document::from_value(item)
                .map_err(|e| Error::invalid_document(format!("entry {i}: {e}")))
        })
        .collect()
}

/// Insert `docs` into the handle's collection, creating it if absent
///
/// Documents without `_id` get a fresh one. Returns the inserted count.
///
/// # Errors
///
/// Connection, permission and storage failures propagate; nothing is
/// swallowed.
pub fn load_documents(handle: &CollectionHandle, mut docs: Vec<Document>) -> Result<usize> {
    for doc in &mut docs {
        doc.ensure_id();
    }

    let conn = handle.connect()?;
    let existed = conn.collection_exists(handle.namespace())?;
    let inserted = conn.insert_many(handle.namespace(), docs)?;

    info!(
        namespace = %handle.namespace(),
        inserted,
        created = !existed,
        "loaded documents"
    );
    Ok(inserted)
}

/// [`parse_blob`] followed by [`load_documents`]
///
/// # Errors
///
/// Returns the first parse or load error.
pub fn load_blob(handle: &CollectionHandle, bytes: &[u8]) -> Result<usize> {
    let docs = parse_blob(bytes)?;
    load_documents(handle, docs)
}
