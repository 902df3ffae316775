//! Project executor.

use alloc::string::String;
use alloc::vec::Vec;
use insight_core::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::ast::ColumnKey;
use crate::executor::{ExecutionError, ExecutionResult, Relation, RelationEntry};

/// One result row: exactly the requested COLUMNS, in COLUMNS order.
///
/// Serialises as a JSON object, e.g. `{"courses_dept":"cpsc","courses_avg":95}`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultRow {
    columns: Vec<(String, Value)>,
}

impl ResultRow {
    /// Creates a row from `(column, value)` pairs.
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    /// Returns the value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns an iterator over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Project executor - reads the requested columns from each row.
pub struct ProjectExecutor<'c> {
    columns: &'c [ColumnKey],
    names: Vec<String>,
}

impl<'c> ProjectExecutor<'c> {
    /// Creates a new project executor.
    pub fn new(columns: &'c [ColumnKey]) -> Self {
        let names = columns.iter().map(ColumnKey::name).collect();
        Self { columns, names }
    }

    /// Executes the projection on the input relation.
    pub fn execute(&self, input: &Relation<'_>) -> ExecutionResult<Vec<ResultRow>> {
        input.iter().map(|entry| self.project(entry)).collect()
    }

    fn project(&self, entry: &RelationEntry<'_>) -> ExecutionResult<ResultRow> {
        let columns = self
            .columns
            .iter()
            .zip(&self.names)
            .map(|(column, name)| match entry.get(column) {
                Some(value) => Ok((name.clone(), value.clone())),
                None => Err(missing(column)),
            })
            .collect::<ExecutionResult<Vec<_>>>()?;
        Ok(ResultRow { columns })
    }
}

fn missing(column: &ColumnKey) -> ExecutionError {
    match column {
        ColumnKey::Field(key) => ExecutionError::MissingValue { field: key.field },
        ColumnKey::Apply(name) => ExecutionError::UnknownApplyKey(name.clone()),
    }
}
