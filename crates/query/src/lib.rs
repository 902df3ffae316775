//! Insight Query - validation and execution engine for dataset queries.
//!
//! This crate turns a JSON query into a result set in three stages:
//!
//! - `grammar`: structural validation of the raw query, producing the typed `ast`
//! - `semantic`: cross-clause rules and resolution of the single referenced dataset
//! - `executor`: filter, group/apply, result-size guard, projection and sort
//!
//! Datasets are supplied through the [`DataSource`] trait; the engine never
//! mutates them.
//!
//! # Example
//!
//! ```
//! use insight_core::{DatasetKind, Field, Record, Value};
//! use insight_query::{InMemoryDataSource, QueryRunner};
//!
//! let source = InMemoryDataSource::new().with_dataset(
//!     "courses",
//!     DatasetKind::Courses,
//!     vec![
//!         Record::new().with(Field::Dept, "cpsc").with(Field::Avg, 95),
//!         Record::new().with(Field::Dept, "math").with(Field::Avg, 80),
//!     ],
//! );
//!
//! let rows = QueryRunner::new(&source)
//!     .run_str(r#"{
//!         "WHERE": { "GT": { "courses_avg": 90 } },
//!         "OPTIONS": { "COLUMNS": ["courses_dept", "courses_avg"], "ORDER": "courses_avg" }
//!     }"#)
//!     .unwrap();
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get("courses_dept"), Some(&Value::from("cpsc")));
//! ```

#![no_std]

extern crate alloc;

pub mod ast;
pub mod config;
pub mod error;
pub mod executor;
pub mod grammar;
pub mod semantic;

pub use config::ExecutionConfig;
pub use error::{ErrorKind, QueryError, QueryResult};
pub use executor::{
    DataSource, ExecutionError, ExecutionResult, InMemoryDataSource, QueryRunner, ResultRow,
};
pub use grammar::parse_query;
