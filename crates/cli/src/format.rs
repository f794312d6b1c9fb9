//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one compact JSON document per line, plus short
//!   status lines for stage/load/init
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use nutriflow_core::Document;
use serde_json::json;

use crate::state::Output;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({
            "error": format!("{:#}", err)
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {:#}", err),
    }
}

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Initialized { config, created } => json!({
            "config": config.display().to_string(),
            "created": created,
        }),
        Output::Staged {
            bucket,
            object,
            bytes,
        } => json!({ "bucket": bucket, "object": object, "bytes": bytes }),
        Output::Loaded {
            collection,
            inserted,
        } => json!({ "collection": collection, "inserted": inserted }),
        Output::Aggregated(results) => {
            let mut map = serde_json::Map::new();
            for (collection, rows) in results {
                map.insert(collection.clone(), json!(rows));
            }
            serde_json::Value::Object(map)
        }
        Output::Documents(docs) => json!(docs),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("(error) {}", e))
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Initialized { config, created } => {
            if *created {
                format!("Wrote {}", config.display())
            } else {
                format!("{} already exists", config.display())
            }
        }
        Output::Staged {
            bucket,
            object,
            bytes,
        } => format!("Uploaded {} to {} ({} bytes)", object, bucket, bytes),
        Output::Loaded {
            collection,
            inserted,
        } => format!("Inserted {} documents into {}", inserted, collection),
        Output::Aggregated(results) => results
            .iter()
            .map(|(collection, rows)| {
                let mut lines = vec![format!("# {} ({} rows)", collection, rows.len())];
                lines.extend(rows.iter().map(document_line));
                lines.join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Documents(docs) if docs.is_empty() => "(empty)".to_string(),
        Output::Documents(docs) => docs.iter().map(document_line).collect::<Vec<_>>().join("\n"),
    }
}

fn document_line(doc: &Document) -> String {
    serde_json::to_string(doc).unwrap_or_else(|e| format!("(error) {}", e))
}
