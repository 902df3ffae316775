//! Record structure.
//!
//! A `Record` is one flat row of a dataset: a mapping from field to value.
//! Records are produced once by ingestion and only read afterwards.

use alloc::collections::BTreeMap;

use crate::field::Field;
use crate::value::Value;

/// A flat record, keyed by field.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<Field, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field value, consuming and returning the record.
    pub fn with(mut self, field: Field, value: impl Into<Value>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Gets the value of a field.
    #[inline]
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(&field)
    }

    /// Sets a field value, returning the previous one.
    pub fn set(&mut self, field: Field, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(field, value.into())
    }

    /// Iterates over the fields present in this record.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.keys().copied()
    }

    /// Iterates over field/value pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &Value)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Returns the number of fields in this record.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this record has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Field, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (Field, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
