//! Raw data ingestion
//!
//! Downloaded API responses are staged as dated JSON objects in a [`Bucket`],
//! then parsed and bulk-inserted into the raw collections by the loader.

mod bucket;
mod loader;

pub use bucket::Bucket;
pub use loader::{load_blob, load_documents, parse_blob};

use crate::config::NutriflowConfig;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Object name for a blob staged on `date`: `<prefix>/<YYYY-MM-DD>.json`
pub fn dated_object_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}/{}.json", prefix, date.format("%Y-%m-%d"))
}

/// The two raw sources the pipeline ingests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Fruityvice fruit list
    Fruit,
    /// Open Food Facts snack search
    Snack,
}

impl Dataset {
    /// Object name prefix inside the bucket
    pub fn object_prefix(self) -> &'static str {
        match self {
            Dataset::Fruit => "fruit_all",
            Dataset::Snack => "snack_all",
        }
    }

    /// Staging bucket configured for this dataset
    pub fn bucket_name(self, config: &NutriflowConfig) -> &str {
        match self {
            Dataset::Fruit => &config.fruit_bucket,
            Dataset::Snack => &config.snack_bucket,
        }
    }

    /// Raw collection configured for this dataset
    pub fn collection_name(self, config: &NutriflowConfig) -> &str {
        match self {
            Dataset::Fruit => &config.fruit_collection,
            Dataset::Snack => &config.snack_collection,
        }
    }

    /// Object name for the blob staged on `date`
    pub fn object_name(self, date: NaiveDate) -> String {
        dated_object_name(self.object_prefix(), date)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Fruit => write!(f, "fruit"),
            Dataset::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fruit" | "fruits" => Ok(Dataset::Fruit),
            "snack" | "snacks" => Ok(Dataset::Snack),
            other => Err(format!("unknown dataset '{other}', expected fruit or snack")),
        }
    }
}
