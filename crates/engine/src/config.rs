//! Configuration via `nutriflow.toml`
//!
//! Every key has a default, so a missing file or an empty file both yield a
//! working configuration. Environment variables override the file; command
//! line flags (applied by the binary) override both.

use nutriflow_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "nutriflow.toml";

/// Environment variable overriding [`NutriflowConfig::uri`]
pub const ENV_URI: &str = "NUTRIFLOW_URI";
/// Environment variable overriding [`NutriflowConfig::database`]
pub const ENV_DATABASE: &str = "NUTRIFLOW_DATABASE";
/// Environment variable overriding [`NutriflowConfig::bucket_root`]
pub const ENV_BUCKET_ROOT: &str = "NUTRIFLOW_BUCKET_ROOT";

/// Pipeline configuration loaded from `nutriflow.toml`.
///
/// # Example
///
/// ```toml
/// uri = "file://.nutriflow"
/// database = "nutrition"
/// fruit_collection = "fruit-data-collection"
/// snack_collection = "snack-data-collection"
/// bucket_root = ".nutriflow-buckets"
/// fruit_bucket = "fruit-data-dds-final-proj"
/// snack_bucket = "snack-data-dds-final-proj"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NutriflowConfig {
    /// Connection URI of the document store.
    pub uri: String,
    /// Database holding raw and derived collections.
    pub database: String,
    /// Raw fruit collection.
    pub fruit_collection: String,
    /// Raw snack collection.
    pub snack_collection: String,
    /// Directory holding the staging buckets.
    pub bucket_root: PathBuf,
    /// Bucket for downloaded fruit blobs.
    pub fruit_bucket: String,
    /// Bucket for downloaded snack blobs.
    pub snack_bucket: String,
}

impl Default for NutriflowConfig {
    fn default() -> Self {
        Self {
            uri: "file://.nutriflow".to_string(),
            database: "nutrition".to_string(),
            fruit_collection: "fruit-data-collection".to_string(),
            snack_collection: "snack-data-collection".to_string(),
            bucket_root: PathBuf::from(".nutriflow-buckets"),
            fruit_bucket: "fruit-data-dds-final-proj".to_string(),
            snack_bucket: "snack-data-dds-final-proj".to_string(),
        }
    }
}

impl NutriflowConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# nutriflow configuration
#
# Document store connection URI:
#   "memory://<name>"  in-process store, lost on exit
#   "file://<path>"    one JSON file per collection under <path>
# Append "?read_only=true" to deny writes.
uri = "file://.nutriflow"

# Database holding raw and derived collections
database = "nutrition"

# Raw collections filled by `nutriflow load`
fruit_collection = "fruit-data-collection"
snack_collection = "snack-data-collection"

# Staging buckets filled by `nutriflow stage`
bucket_root = ".nutriflow-buckets"
fruit_bucket = "fruit-data-dds-final-proj"
snack_bucket = "snack-data-dds-final-proj"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: NutriflowConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists (defaults otherwise), then apply
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed or the result is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `NUTRIFLOW_*` overrides from a variable lookup
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(uri) = lookup(ENV_URI) {
            self.uri = uri;
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            self.database = database;
        }
        if let Some(root) = lookup(ENV_BUCKET_ROOT) {
            self.bucket_root = PathBuf::from(root);
        }
    }

    /// Reject empty names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first empty key.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("uri", self.uri.as_str()),
            ("database", self.database.as_str()),
            ("fruit_collection", self.fruit_collection.as_str()),
            ("snack_collection", self.snack_collection.as_str()),
            ("fruit_bucket", self.fruit_bucket.as_str()),
            ("snack_bucket", self.snack_bucket.as_str()),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(format!("'{key}' must not be empty")));
            }
        }
        if self.bucket_root.as_os_str().is_empty() {
            return Err(Error::invalid_config("'bucket_root' must not be empty"));
        }
        Ok(())
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` if the file was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| {
            Error::invalid_config(format!(
                "failed to write default config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(true)
    }
}
