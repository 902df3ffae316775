//! Database - main entry point for dataset management and queries.
//!
//! Readers and writers never block each other: every query runs against an
//! immutable snapshot of the dataset store loaded from an `ArcSwap`. Writers
//! serialise on a mutex, copy the current store, apply their change, and
//! publish the copy. A query in flight keeps the snapshot it started with.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use insight_core::{DatasetKind, Record};
use insight_query::{QueryRunner, ResultRow};
use insight_storage::{ingest, Dataset, DatasetCache, DatasetInfo};
use serde_json::Value as Json;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// The main database interface.
///
/// Provides methods for:
/// - Adding datasets (from records or course files) and removing them
/// - Listing datasets
/// - Running queries
pub struct Database {
    config: DatabaseConfig,
    store: ArcSwap<DatasetCache>,
    writer: Mutex<()>,
}

impl Database {
    /// Creates an empty database. Persisted datasets are not loaded; see
    /// [`open`](Self::open).
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            store: ArcSwap::from_pointee(DatasetCache::new()),
            writer: Mutex::new(()),
        }
    }

    /// Creates a database and reloads every dataset persisted under
    /// `config.data_dir`. Persisted datasets the store rejects (empty, a
    /// duplicate id, records off the kind's schema) are skipped with a
    /// warning.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        let db = Self::new(config);
        #[cfg(feature = "persist")]
        if let Some(dir) = &db.config.data_dir {
            let mut cache = DatasetCache::new();
            for dataset in insight_storage::persist::load_all(dir)? {
                let (id, kind, rows) = (dataset.id().to_string(), dataset.kind(), dataset.len());
                match cache.add(dataset) {
                    Ok(()) => log::info!("reloaded dataset {} ({}, {} rows)", id, kind, rows),
                    Err(err) => log::warn!("skipping persisted dataset {} ({}): {}", id, kind, err),
                }
            }
            db.store.store(Arc::new(cache));
        }
        Ok(db)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns the current snapshot of the dataset store.
    pub fn snapshot(&self) -> Arc<DatasetCache> {
        self.store.load_full()
    }

    /// Adds a dataset and returns the ids of all datasets, sorted.
    pub fn add_dataset(&self, id: &str, kind: DatasetKind, records: Vec<Record>) -> Result<Vec<String>> {
        self.insert(Dataset::new(id, kind, records))
    }

    /// Parses course files into a courses dataset and adds it.
    pub fn add_course_files<I, S>(&self, id: &str, files: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        insight_storage::validate_dataset_id(id)?;
        let records = ingest::parse_course_files(files)?;
        self.add_dataset(id, DatasetKind::Courses, records)
    }

    fn insert(&self, dataset: Dataset) -> Result<Vec<String>> {
        let _guard = self.lock_writer();
        let mut next = DatasetCache::clone(&self.store.load());
        let (id, kind, rows) = (dataset.id().to_string(), dataset.kind(), dataset.len());
        next.add(dataset)?;

        #[cfg(feature = "persist")]
        if let (Some(dir), Some(dataset)) = (&self.config.data_dir, next.get(&id)) {
            insight_storage::persist::save(dir, dataset)?;
        }

        let ids = next.ids().into_iter().map(String::from).collect();
        self.store.store(Arc::new(next));
        log::info!("added dataset {} ({}, {} rows)", id, kind, rows);
        Ok(ids)
    }

    /// Removes a dataset and returns its id.
    pub fn remove_dataset(&self, id: &str) -> Result<String> {
        let _guard = self.lock_writer();
        let mut next = DatasetCache::clone(&self.store.load());
        let removed = next.remove(id)?;

        #[cfg(feature = "persist")]
        if let Some(dir) = &self.config.data_dir {
            insight_storage::persist::remove(dir, removed.id(), removed.kind())?;
        }

        self.store.store(Arc::new(next));
        log::info!("removed dataset {}", removed.id());
        Ok(removed.id().to_string())
    }

    /// Lists all datasets, sorted by id.
    pub fn list_datasets(&self) -> Vec<DatasetInfo> {
        self.store.load().infos()
    }

    /// Validates and runs a query against the current snapshot.
    pub fn perform_query(&self, query: &Json) -> Result<Vec<ResultRow>> {
        let snapshot = self.store.load_full();
        let rows = QueryRunner::new(snapshot.as_ref())
            .with_config(self.config.execution)
            .run(query)?;
        Ok(rows)
    }

    /// Parses JSON text and runs it as a query.
    pub fn perform_query_str(&self, text: &str) -> Result<Vec<ResultRow>> {
        let snapshot = self.store.load_full();
        let rows = QueryRunner::new(snapshot.as_ref())
            .with_config(self.config.execution)
            .run_str(text)?;
        Ok(rows)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        // the guarded state is the published snapshot, which a panicking
        // writer never half-updates
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new(DatabaseConfig::default())
    }
}
