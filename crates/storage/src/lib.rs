//! Insight Storage - dataset store for the Insight query engine.
//!
//! This crate provides:
//!
//! - `Dataset` / `DatasetInfo`: immutable record collections and their listings
//! - `DatasetCache`: id → dataset map, usable directly as a query `DataSource`
//! - `ingest`: course file parsing
//! - `persist`: JSON files under a data directory (feature `persist`)
//!
//! # Example
//!
//! ```rust
//! use insight_core::DatasetKind;
//! use insight_query::QueryRunner;
//! use insight_storage::{ingest, Dataset, DatasetCache};
//!
//! let file = r#"{"result": [{
//!     "Subject": "cpsc", "Course": "310", "Avg": 95, "Professor": "holmes",
//!     "Title": "sft eng", "Pass": 90, "Fail": 2, "Audit": 0, "id": 7, "Year": "2015"
//! }]}"#;
//! let records = ingest::parse_course_file(file).unwrap();
//!
//! let mut cache = DatasetCache::new();
//! cache.add(Dataset::new("courses", DatasetKind::Courses, records)).unwrap();
//!
//! let rows = QueryRunner::new(&cache)
//!     .run_str(r#"{"WHERE": {}, "OPTIONS": {"COLUMNS": ["courses_avg"]}}"#)
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

pub mod cache;
pub mod dataset;
pub mod error;
pub mod ingest;
#[cfg(feature = "persist")]
pub mod persist;

pub use cache::DatasetCache;
pub use dataset::{validate_dataset_id, Dataset, DatasetInfo};
pub use error::{Result, StorageError};
