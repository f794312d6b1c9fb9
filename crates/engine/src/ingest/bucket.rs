//! Directory-backed blob buckets
//!
//! A bucket is a directory under a root; object names may contain `/` and map
//! to nested paths. Objects are written with temp + fsync + rename so a reader
//! never sees a partially written blob.

use nutriflow_core::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// A named bucket of staged objects
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    dir: PathBuf,
}

impl Bucket {
    /// Open the bucket `name` under `root`, creating it if missing
    ///
    /// An existing bucket is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the directory cannot be created.
    pub fn open_or_create(root: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']) {
            return Err(Error::storage(format!("invalid bucket name '{name}'")));
        }
        let dir = root.join(name);
        if dir.is_dir() {
            debug!(bucket = name, "bucket already exists");
        } else {
            fs::create_dir_all(&dir)?;
            info!(bucket = name, path = %dir.display(), "created bucket");
        }
        Ok(Bucket {
            name: name.to_string(),
            dir,
        })
    }

    /// Bucket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bucket directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn object_path(&self, object: &str) -> Result<PathBuf> {
        let relative = Path::new(object);
        let valid = !object.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(part) if !part.to_string_lossy().starts_with('.')));
        if !valid {
            return Err(Error::storage(format!("invalid object name '{object}'")));
        }
        Ok(self.dir.join(relative))
    }

    /// Store `data` as `object`, replacing any previous version
    ///
    /// # Errors
    ///
    /// Returns an error if the object name is invalid or the write fails.
    pub fn put(&self, object: &str, data: &[u8]) -> Result<()> {
        let path = self.object_path(object)?;
        let parent = path.parent().unwrap_or(&self.dir);
        fs::create_dir_all(parent)?;

        let tmp_path = parent.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        info!(bucket = %self.name, object, bytes = data.len(), "uploaded object");
        Ok(())
    }

    /// Read `object`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the object does not exist, or the I/O
    /// error if it cannot be read.
    pub fn get(&self, object: &str) -> Result<Vec<u8>> {
        let path = self.object_path(object)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::storage(format!(
                "object '{}' not found in bucket '{}'",
                object, self.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// True if `object` has been stored
    pub fn contains(&self, object: &str) -> bool {
        self.object_path(object).map_or(false, |p| p.is_file())
    }
}
