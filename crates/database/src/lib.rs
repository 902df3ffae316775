//! Insight Database - dataset management and query facade.
//!
//! This crate ties the Insight crates together behind one entry point:
//!
//! - `Database`: add/remove/list datasets and run queries against
//!   snapshot-isolated dataset stores
//! - `DatabaseConfig`: persistence directory and execution settings
//! - `QueryResponse`: maps operation outcomes to status codes and JSON bodies
//!
//! # Example
//!
//! ```rust
//! use insight_database::{Database, DatabaseConfig, QueryResponse};
//! use serde_json::json;
//!
//! let file = json!({ "result": [
//!     { "Subject": "cpsc", "Course": "310", "Avg": 95, "Professor": "holmes",
//!       "Title": "sft eng", "Pass": 90, "Fail": 2, "Audit": 0, "id": 1, "Year": 2015 },
//!     { "Subject": "math", "Course": "100", "Avg": 80, "Professor": "smith",
//!       "Title": "calculus", "Pass": 70, "Fail": 9, "Audit": 1, "id": 2, "Year": 2015 }
//! ] });
//!
//! let db = Database::new(DatabaseConfig::in_memory());
//! db.add_course_files("courses", [file.to_string()]).unwrap();
//!
//! let response = QueryResponse::from_result(db.perform_query(&json!({
//!     "WHERE": { "GT": { "courses_avg": 90 } },
//!     "OPTIONS": { "COLUMNS": ["courses_dept", "courses_avg"], "ORDER": "courses_avg" }
//! })));
//!
//! assert_eq!(response.status, 200);
//! assert_eq!(
//!     response.to_json(),
//!     json!({ "result": [{ "courses_dept": "cpsc", "courses_avg": 95 }] })
//! );
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod response;

pub use config::DatabaseConfig;
pub use database::Database;
pub use error::{DatabaseError, Result};
pub use response::{QueryResponse, ResponseBody};
