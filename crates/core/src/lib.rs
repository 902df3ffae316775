//! Insight Core - Core types for the Insight query engine.
//!
//! This crate provides the foundational types shared by the validator, the
//! executor and the dataset store:
//!
//! - `Value`: A number or a string held in a record field
//! - `Record`: A flat mapping from field to value
//! - `Field` / `FieldType`: The closed enumeration of queryable fields
//! - `FieldKey`: A dataset-qualified field reference (`courses_avg`)
//! - `DatasetKind`: The kind of a dataset, which fixes its schema
//! - `WildcardPattern`: Compiled IS patterns
//! - `Error`: Error types for parsing keys, kinds and patterns
//!
//! # Example
//!
//! ```rust
//! use insight_core::{Field, FieldKey, Record, Value};
//!
//! let key = FieldKey::parse("courses_avg").unwrap();
//! assert_eq!(key.field, Field::Avg);
//!
//! let record = Record::new()
//!     .with(Field::Dept, "cpsc")
//!     .with(Field::Avg, 95.0);
//!
//! assert_eq!(record.get(key.field), Some(&Value::Number(95.0)));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod field;
mod record;
mod types;
mod value;
pub mod wildcard;

pub use error::{Error, Result};
pub use field::{Field, FieldKey};
pub use record::Record;
pub use types::{DatasetKind, FieldType};
pub use value::Value;
pub use wildcard::WildcardPattern;
