//! Resolved configuration plus the client shared by every command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use nutriflow_analytics::{
    aggregate_fruits_by_family, get_all_fruits, get_families_with_multiple_fruits,
    get_fruits_by_order, get_snacks_with_no_additives, summary_nutrition_total_fruit,
    FAMILY_AGGREGATES_COLLECTION, NUTRITION_SUMMARY_COLLECTION,
};
use nutriflow_core::Document;
use nutriflow_engine::{
    load_blob, Bucket, Client, CollectionHandle, Dataset, NutriflowConfig, StoreUri,
};

use crate::parse::{AggregateTarget, CliAction, QueryKind};

/// What a command produced.
#[derive(Debug)]
pub enum Output {
    /// Config file and store directory prepared
    Initialized {
        config: PathBuf,
        created: bool,
    },
    /// Blob copied into a bucket
    Staged {
        bucket: String,
        object: String,
        bytes: usize,
    },
    /// Documents inserted into a raw collection
    Loaded {
        collection: String,
        inserted: usize,
    },
    /// Derived collections rebuilt, with their new rows
    Aggregated(Vec<(String, Vec<Document>)>),
    /// Query result
    Documents(Vec<Document>),
}

/// Configuration and client for one invocation.
pub struct SessionState {
    config: NutriflowConfig,
    config_path: PathBuf,
    client: Client,
}

impl SessionState {
    /// Create a session from a resolved configuration.
    pub fn new(config: NutriflowConfig, config_path: PathBuf) -> Self {
        let client = Client::new(config.uri.clone());
        Self {
            config,
            config_path,
            client,
        }
    }

    fn handle(&self, collection: &str) -> CollectionHandle {
        self.client.collection(&self.config.database, collection)
    }

    fn bucket(&self, dataset: Dataset) -> Result<Bucket> {
        let name = dataset.bucket_name(&self.config);
        Bucket::open_or_create(&self.config.bucket_root, name)
            .with_context(|| format!("failed to open bucket '{}'", name))
    }

    /// Run one action.
    pub fn execute(&self, action: CliAction) -> Result<Output> {
        match action {
            CliAction::Init => self.init(),
            CliAction::Stage {
                dataset,
                file,
                date,
            } => self.stage(dataset, &file, date),
            CliAction::Load { dataset, date } => self.load(dataset, date),
            CliAction::Aggregate(target) => self.aggregate(target),
            CliAction::Query(kind) => self.query(kind),
        }
    }

    fn init(&self) -> Result<Output> {
        let created = NutriflowConfig::write_default_if_missing(&self.config_path)?;
        if let Ok(StoreUri::File { root, .. }) = StoreUri::parse(&self.config.uri) {
            fs::create_dir_all(&root)
                .with_context(|| format!("failed to create store directory '{}'", root.display()))?;
        }
        Ok(Output::Initialized {
            config: self.config_path.clone(),
            created,
        })
    }

    fn stage(&self, dataset: Dataset, file: &Path, date: NaiveDate) -> Result<Output> {
        let data =
            fs::read(file).with_context(|| format!("failed to read '{}'", file.display()))?;
        let bucket = self.bucket(dataset)?;
        let object = dataset.object_name(date);
        bucket.put(&object, &data)?;
        Ok(Output::Staged {
            bucket: bucket.name().to_string(),
            object,
            bytes: data.len(),
        })
    }

    fn load(&self, dataset: Dataset, date: NaiveDate) -> Result<Output> {
        let bucket = self.bucket(dataset)?;
        let object = dataset.object_name(date);
        let data = bucket.get(&object)?;

        let collection = dataset.collection_name(&self.config).to_string();
        let inserted = load_blob(&self.handle(&collection), &data)
            .with_context(|| format!("failed to load '{}' into '{}'", object, collection))?;
        Ok(Output::Loaded {
            collection,
            inserted,
        })
    }

    fn aggregate(&self, target: AggregateTarget) -> Result<Output> {
        let fruits = self.handle(&self.config.fruit_collection);
        let mut results = Vec::new();
        if matches!(target, AggregateTarget::Summary | AggregateTarget::All) {
            let rows = summary_nutrition_total_fruit(&fruits)?;
            results.push((NUTRITION_SUMMARY_COLLECTION.to_string(), rows));
        }
        if matches!(target, AggregateTarget::Families | AggregateTarget::All) {
            let rows = aggregate_fruits_by_family(&fruits)?;
            results.push((FAMILY_AGGREGATES_COLLECTION.to_string(), rows));
        }
        Ok(Output::Aggregated(results))
    }

    fn query(&self, kind: QueryKind) -> Result<Output> {
        let docs = match kind {
            QueryKind::Fruits { order: None } => {
                get_all_fruits(&self.handle(&self.config.fruit_collection))?
            }
            QueryKind::Fruits { order: Some(order) } => {
                get_fruits_by_order(&self.handle(&self.config.fruit_collection), &order)?
            }
            QueryKind::Snacks => {
                get_snacks_with_no_additives(&self.handle(&self.config.snack_collection))?
            }
            QueryKind::Families => {
                get_families_with_multiple_fruits(&self.handle(FAMILY_AGGREGATES_COLLECTION))?
            }
        };
        Ok(Output::Documents(docs))
    }
}
