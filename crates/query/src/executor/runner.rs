//! Query runner - drives a validated query through the executors.
//!
//! Execution order: fetch the dataset, filter, group/apply, enforce the
//! result-size cap, project, sort. Any error aborts the call; partial
//! results are never returned.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use insight_core::{DatasetKind, Field, Record};
use serde_json::Value as Json;

use crate::ast::Query;
use crate::config::ExecutionConfig;
use crate::error::{QueryError, QueryResult};
use crate::executor::{
    AggregateExecutor, FilterExecutor, ProjectExecutor, Relation, ResultRow, SortExecutor,
};
use crate::{grammar, semantic};

/// Error type for query execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionError {
    /// Dataset not found in the data source.
    DatasetNotFound(String),
    /// A record lacks a field the query reads.
    MissingValue { field: Field },
    /// A COLUMNS apply-key has no computed value.
    UnknownApplyKey(String),
    /// A value has the wrong type for the operation applied to it.
    TypeMismatch(String),
    /// More rows than the configured cap.
    ResultTooLarge { limit: usize, actual: usize },
}

impl core::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExecutionError::DatasetNotFound(id) => write!(f, "dataset {} does not exist", id),
            ExecutionError::MissingValue { field } => {
                write!(f, "record has no value for field {}", field)
            }
            ExecutionError::UnknownApplyKey(key) => write!(f, "apply key {} is not computed", key),
            ExecutionError::TypeMismatch(msg) => write!(f, "Type mismatch: {}", msg),
            ExecutionError::ResultTooLarge { limit, actual } => {
                write!(f, "{} rows exceed the limit of {}", actual, limit)
            }
        }
    }
}

impl core::error::Error for ExecutionError {}

impl From<ExecutionError> for QueryError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::ResultTooLarge { limit, actual } => {
                QueryError::result_too_large(limit, actual)
            }
            other => QueryError::semantic(other.to_string()),
        }
    }
}

/// Result type for query execution.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Data source trait for providing dataset records.
///
/// The engine only ever reads through this trait.
pub trait DataSource {
    /// Returns all records of a dataset, in dataset order.
    fn records(&self, dataset: &str) -> ExecutionResult<&[Record]>;

    /// Returns the kind of a dataset, or `None` if it is unknown.
    fn kind(&self, dataset: &str) -> Option<DatasetKind>;

    /// Returns the ids of all known datasets.
    fn dataset_ids(&self) -> Vec<String>;

    /// Returns true if the dataset is known.
    fn contains(&self, dataset: &str) -> bool {
        self.kind(dataset).is_some()
    }
}

/// A simple in-memory data source for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDataSource {
    datasets: BTreeMap<String, (DatasetKind, Vec<Record>)>,
}

impl InMemoryDataSource {
    /// Creates an empty data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a dataset.
    pub fn add_dataset(&mut self, id: impl Into<String>, kind: DatasetKind, records: Vec<Record>) {
        self.datasets.insert(id.into(), (kind, records));
    }

    /// Builder form of [`add_dataset`](Self::add_dataset).
    pub fn with_dataset(
        mut self,
        id: impl Into<String>,
        kind: DatasetKind,
        records: Vec<Record>,
    ) -> Self {
        self.add_dataset(id, kind, records);
        self
    }

    /// Removes a dataset, returning its records.
    pub fn remove_dataset(&mut self, id: &str) -> Option<Vec<Record>> {
        self.datasets.remove(id).map(|(_, records)| records)
    }
}

impl DataSource for InMemoryDataSource {
    fn records(&self, dataset: &str) -> ExecutionResult<&[Record]> {
        self.datasets
            .get(dataset)
            .map(|(_, records)| records.as_slice())
            .ok_or_else(|| ExecutionError::DatasetNotFound(dataset.into()))
    }

    fn kind(&self, dataset: &str) -> Option<DatasetKind> {
        self.datasets.get(dataset).map(|(kind, _)| *kind)
    }

    fn dataset_ids(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }
}

/// Runs queries against a data source.
pub struct QueryRunner<'a, D: DataSource + ?Sized> {
    source: &'a D,
    config: ExecutionConfig,
}

impl<'a, D: DataSource + ?Sized> QueryRunner<'a, D> {
    /// Creates a runner with the default configuration.
    pub fn new(source: &'a D) -> Self {
        Self {
            source,
            config: ExecutionConfig::default(),
        }
    }

    /// Replaces the execution configuration.
    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the execution configuration.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Parses JSON text and runs it.
    pub fn run_str(&self, text: &str) -> QueryResult<Vec<ResultRow>> {
        let query = grammar::parse_query(text)?;
        self.run_query(&query)
    }

    /// Validates a raw query and runs it.
    pub fn run(&self, raw: &Json) -> QueryResult<Vec<ResultRow>> {
        let query = grammar::validate(raw)?;
        self.run_query(&query)
    }

    /// Runs a grammatically valid query: semantic checks, then execution.
    pub fn run_query(&self, query: &Query) -> QueryResult<Vec<ResultRow>> {
        let dataset = semantic::validate(query, self.source)?;
        Ok(self.execute(query, &dataset)?)
    }

    /// Executes a validated query against `dataset`.
    pub fn execute(&self, query: &Query, dataset: &str) -> ExecutionResult<Vec<ResultRow>> {
        let records = self.source.records(dataset)?;

        let matched = match &query.filter {
            Some(filter) => FilterExecutor::new(filter).execute(records),
            None => (0..records.len()).collect(),
        };
        log::debug!(
            "dataset {}: {} of {} records matched",
            dataset,
            matched.len(),
            records.len()
        );

        let relation = match &query.transformations {
            Some(transformations) => Relation::from_groups(
                AggregateExecutor::new(transformations).execute(records, &matched)?,
            ),
            None => Relation::from_records(records, &matched),
        };

        if relation.len() > self.config.max_results {
            log::debug!(
                "rejecting result of {} rows (limit {})",
                relation.len(),
                self.config.max_results
            );
            return Err(ExecutionError::ResultTooLarge {
                limit: self.config.max_results,
                actual: relation.len(),
            });
        }

        let mut rows = ProjectExecutor::new(&query.options.columns).execute(&relation)?;
        if let Some(order) = &query.options.order {
            SortExecutor::new(order).execute(&mut rows);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use insight_core::Value;
    use serde_json::json;

    fn source() -> InMemoryDataSource {
        InMemoryDataSource::new().with_dataset(
            "courses",
            DatasetKind::Courses,
            vec![
                Record::new().with(Field::Dept, "cpsc").with(Field::Avg, 95),
                Record::new().with(Field::Dept, "math").with(Field::Avg, 80),
                Record::new().with(Field::Dept, "cpsc").with(Field::Avg, 85),
            ],
        )
    }

    #[test]
    fn test_in_memory_data_source() {
        let mut source = source();
        assert_eq!(source.dataset_ids(), vec![String::from("courses")]);
        assert_eq!(source.kind("courses"), Some(DatasetKind::Courses));
        assert!(source.contains("courses"));
        assert_eq!(source.records("courses").unwrap().len(), 3);
        assert_eq!(
            source.records("rooms"),
            Err(ExecutionError::DatasetNotFound("rooms".into()))
        );

        assert!(source.remove_dataset("courses").is_some());
        assert!(!source.contains("courses"));
    }

    #[test]
    fn test_run_filter_and_order() {
        let source = source();
        let rows = QueryRunner::new(&source)
            .run(&json!({
                "WHERE": { "GT": { "courses_avg": 82 } },
                "OPTIONS": { "COLUMNS": ["courses_dept", "courses_avg"], "ORDER": "courses_avg" }
            }))
            .unwrap();

        assert_eq!(
            rows,
            vec![
                ResultRow::new(vec![
                    ("courses_dept".into(), Value::from("cpsc")),
                    ("courses_avg".into(), Value::from(85)),
                ]),
                ResultRow::new(vec![
                    ("courses_dept".into(), Value::from("cpsc")),
                    ("courses_avg".into(), Value::from(95)),
                ]),
            ]
        );
    }

    #[test]
    fn test_result_cap_from_config() {
        let source = source();
        let query = json!({ "WHERE": {}, "OPTIONS": { "COLUMNS": ["courses_dept"] } });

        let capped = QueryRunner::new(&source)
            .with_config(ExecutionConfig::default().with_max_results(2))
            .run(&query);
        assert_eq!(capped, Err(QueryError::result_too_large(2, 3)));

        let exact = QueryRunner::new(&source)
            .with_config(ExecutionConfig::default().with_max_results(3))
            .run(&query);
        assert_eq!(exact.map(|rows| rows.len()), Ok(3));
    }

    #[test]
    fn test_cap_applies_after_grouping() {
        let source = source();
        let rows = QueryRunner::new(&source)
            .with_config(ExecutionConfig::default().with_max_results(2))
            .run(&json!({
                "WHERE": {},
                "OPTIONS": { "COLUMNS": ["courses_dept"] },
                "TRANSFORMATIONS": {
                    "GROUP": ["courses_dept"],
                    "APPLY": [{ "n": { "COUNT": "courses_avg" } }]
                }
            }))
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_execute_unknown_dataset() {
        let source = source();
        let query = grammar::validate(&json!({
            "WHERE": {}, "OPTIONS": { "COLUMNS": ["rooms_name"] }
        }))
        .unwrap();
        assert_eq!(
            QueryRunner::new(&source).execute(&query, "rooms"),
            Err(ExecutionError::DatasetNotFound("rooms".into()))
        );
    }

    #[test]
    fn test_execution_error_conversion() {
        let err: QueryError = ExecutionError::DatasetNotFound("rooms".into()).into();
        assert_eq!(err, QueryError::semantic("dataset rooms does not exist"));

        let err: QueryError = ExecutionError::ResultTooLarge { limit: 1, actual: 2 }.into();
        assert_eq!(err, QueryError::result_too_large(1, 2));
    }

    #[test]
    fn test_runner_over_trait_object() {
        let source = source();
        let dynamic: &dyn DataSource = &source;
        let rows = QueryRunner::new(dynamic)
            .run_str(r#"{"WHERE":{"IS":{"courses_dept":"math"}},"OPTIONS":{"COLUMNS":["courses_avg"]}}"#)
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
