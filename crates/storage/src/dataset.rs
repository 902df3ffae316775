//! Datasets and dataset ids.

use std::sync::Arc;

use insight_core::{DatasetKind, Field, Record};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Checks that `id` is usable as a dataset id: non-empty, not only
/// whitespace, and free of underscores (which separate the id from the
/// field name in query keys).
pub fn validate_dataset_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(StorageError::invalid_id(id, "id cannot be empty"));
    }
    if id.trim().is_empty() {
        return Err(StorageError::invalid_id(id, "id cannot be only whitespace"));
    }
    if id.contains('_') {
        return Err(StorageError::invalid_id(id, "id cannot contain an underscore"));
    }
    Ok(())
}

/// An immutable, named collection of records of one kind.
#[derive(Clone, Debug)]
pub struct Dataset {
    id: String,
    kind: DatasetKind,
    records: Arc<[Record]>,
}

impl Dataset {
    /// Creates a dataset. The id is not validated here; see
    /// [`validate_dataset_id`].
    pub fn new(id: impl Into<String>, kind: DatasetKind, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            kind,
            records: records.into(),
        }
    }

    /// Returns the dataset id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the dataset kind.
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Returns the records, in ingestion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Checks that every record carries exactly the fields of the dataset's
    /// kind, each holding a value of the field's type.
    pub fn validate_schema(&self) -> Result<()> {
        let schema = Field::for_kind(self.kind);
        for (row, record) in self.records.iter().enumerate() {
            if let Some(field) = record.fields().find(|field| !field.belongs_to(self.kind)) {
                return Err(self.schema_error(row, format!("unexpected field {}", field)));
            }
            for &field in schema {
                match record.get(field) {
                    None => return Err(self.schema_error(row, format!("missing field {}", field))),
                    Some(value) if value.field_type() != field.field_type() => {
                        return Err(self.schema_error(row, format!("field {} has the wrong type", field)));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    fn schema_error(&self, row: usize, reason: String) -> StorageError {
        StorageError::SchemaMismatch {
            id: self.id.clone(),
            kind: self.kind,
            row,
            reason,
        }
    }

    /// Returns the listing entry for this dataset.
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id.clone(),
            kind: self.kind,
            num_rows: self.records.len(),
        }
    }
}

/// Summary of a stored dataset, as reported by dataset listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub id: String,
    pub kind: DatasetKind,
    pub num_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::Field;

    #[test]
    fn test_valid_ids() {
        assert!(validate_dataset_id("courses").is_ok());
        assert!(validate_dataset_id("my courses").is_ok());
        assert!(validate_dataset_id(" x ").is_ok());
    }

    #[test]
    fn test_invalid_ids() {
        for id in ["", " ", "\t\n", "my_courses", "_"] {
            assert!(
                matches!(validate_dataset_id(id), Err(StorageError::InvalidId { .. })),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_dataset_info() {
        let dataset = Dataset::new(
            "courses",
            DatasetKind::Courses,
            vec![Record::new().with(Field::Avg, 1), Record::new().with(Field::Avg, 2)],
        );
        let info = dataset.info();
        assert_eq!(info.num_rows, 2);
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::json!({ "id": "courses", "kind": "courses", "numRows": 2 })
        );
    }
}
