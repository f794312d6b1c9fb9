//! FileStore: one JSON file per collection
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/<database>/<collection>.json
//! ```
//!
//! Each file holds a JSON array of documents. Writes go to a uniquely named
//! temporary file in the same directory, are fsynced, then renamed over the
//! collection file, so readers always open a complete file.
//!
//! `insert_many` is a read-modify-write. It shares a process-local write lock
//! with `replace_collection`, so an insert never renames stale contents over a
//! newer replacement. Concurrent replacements are last-writer-wins.

use crate::store::{DocumentStore, Namespace};
use nutriflow_core::{Document, Error, Result};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const COLLECTION_EXT: &str = "json";

/// Directory-backed document store
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at an existing directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unreachable`] if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::unreachable(
                format!("file://{}", root.display()),
                "root directory does not exist",
            ));
        }
        Ok(FileStore {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, ns: &Namespace) -> Result<PathBuf> {
        check_name("database", &ns.database)?;
        check_name("collection", &ns.collection)?;
        Ok(self
            .root
            .join(&ns.database)
            .join(format!("{}.{}", ns.collection, COLLECTION_EXT)))
    }

    fn read_collection(path: &Path) -> Result<Option<Vec<Document>>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let docs: Vec<Document> = serde_json::from_slice(&bytes).map_err(|e| {
            Error::storage(format!("corrupt collection file '{}': {}", path.display(), e))
        })?;
        Ok(Some(docs))
    }

    fn write_collection(path: &Path, docs: &[Document]) -> Result<()> {
        let dir = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let payload = serde_json::to_vec(docs)?;

        // Atomic write: temp + fsync + rename
        let tmp_path = dir.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %path.display(), documents = docs.len(), "wrote collection file");
        Ok(())
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(Error::storage(format!("invalid {kind} name '{name}'")));
    }
    Ok(())
}

impl DocumentStore for FileStore {
    fn snapshot(&self, ns: &Namespace) -> Result<Option<Arc<Vec<Document>>>> {
        let path = self.collection_path(ns)?;
        Ok(Self::read_collection(&path)?.map(Arc::new))
    }

    fn insert_many(&self, ns: &Namespace, docs: Vec<Document>) -> Result<usize> {
        let path = self.collection_path(ns)?;
        let inserted = docs.len();

        let _guard = self.write_lock.lock();
        let mut contents = Self::read_collection(&path)?.unwrap_or_default();
        contents.extend(docs);
        Self::write_collection(&path, &contents)?;
        Ok(inserted)
    }

    fn replace_collection(&self, ns: &Namespace, docs: Vec<Document>) -> Result<()> {
        let path = self.collection_path(ns)?;
        let _guard = self.write_lock.lock();
        Self::write_collection(&path, &docs)
    }

    fn list_collections(&self, database: &str) -> Result<Vec<String>> {
        check_name("database", database)?;
        let dir = self.root.join(database);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(COLLECTION_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
