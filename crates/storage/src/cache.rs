//! Cache management for Insight datasets.
//!
//! This module provides the `DatasetCache` struct which maps dataset ids to
//! immutable datasets. Datasets are held behind `Arc`, so cloning the cache
//! to build a new snapshot copies only the map.

use std::collections::BTreeMap;
use std::sync::Arc;

use insight_core::{DatasetKind, Record};
use insight_query::{DataSource, ExecutionError, ExecutionResult};

use crate::dataset::{validate_dataset_id, Dataset, DatasetInfo};
use crate::error::{Result, StorageError};

/// Cache for managing multiple datasets.
#[derive(Clone, Debug, Default)]
pub struct DatasetCache {
    /// Dataset id → dataset mapping.
    datasets: BTreeMap<String, Arc<Dataset>>,
}

impl DatasetCache {
    /// Creates a new empty dataset cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset. The id must be valid and unused, and the dataset must
    /// contain at least one record, every record matching the kind's schema.
    pub fn add(&mut self, dataset: Dataset) -> Result<()> {
        validate_dataset_id(dataset.id())?;
        if self.datasets.contains_key(dataset.id()) {
            return Err(StorageError::Duplicate(dataset.id().to_string()));
        }
        if dataset.is_empty() {
            return Err(StorageError::Empty(dataset.id().to_string()));
        }
        dataset.validate_schema()?;
        self.datasets
            .insert(dataset.id().to_string(), Arc::new(dataset));
        Ok(())
    }

    /// Removes a dataset and returns it.
    pub fn remove(&mut self, id: &str) -> Result<Arc<Dataset>> {
        validate_dataset_id(id)?;
        self.datasets
            .remove(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Gets a dataset by id.
    pub fn get(&self, id: &str) -> Option<&Arc<Dataset>> {
        self.datasets.get(id)
    }

    /// Checks if a dataset exists.
    pub fn has_dataset(&self, id: &str) -> bool {
        self.datasets.contains_key(id)
    }

    /// Returns all dataset ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        self.datasets.keys().map(|s| s.as_str()).collect()
    }

    /// Returns the listing entry of every dataset, sorted by id.
    pub fn infos(&self) -> Vec<DatasetInfo> {
        self.datasets.values().map(|d| d.info()).collect()
    }

    /// Returns the number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns true if there are no datasets.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Returns the total record count across all datasets.
    pub fn total_row_count(&self) -> usize {
        self.datasets.values().map(|d| d.len()).sum()
    }
}

impl DataSource for DatasetCache {
    fn records(&self, dataset: &str) -> ExecutionResult<&[Record]> {
        self.datasets
            .get(dataset)
            .map(|d| d.records())
            .ok_or_else(|| ExecutionError::DatasetNotFound(dataset.to_string()))
    }

    fn kind(&self, dataset: &str) -> Option<DatasetKind> {
        self.datasets.get(dataset).map(|d| d.kind())
    }

    fn dataset_ids(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }
}
