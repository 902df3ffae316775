//! Relation and RelationEntry types for query execution.

use alloc::string::String;
use alloc::vec::Vec;
use insight_core::{Field, Record, Value};

use crate::ast::ColumnKey;

/// One output row of GROUP/APPLY: the shared group values plus one value per
/// apply rule.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupRow {
    /// GROUP field values, in GROUP order.
    pub keys: Vec<(Field, Value)>,
    /// Computed apply-key values, in APPLY order.
    pub applied: Vec<(String, Value)>,
}

impl GroupRow {
    /// Returns the value of a GROUP field.
    pub fn key(&self, field: Field) -> Option<&Value> {
        self.keys
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value)
    }

    /// Returns the value of an apply-key.
    pub fn applied(&self, name: &str) -> Option<&Value> {
        self.applied
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// A row flowing between executors: a borrowed dataset record, or a row
/// produced by grouping.
#[derive(Clone, Debug)]
pub enum RelationEntry<'a> {
    Record(&'a Record),
    Group(GroupRow),
}

impl RelationEntry<'_> {
    /// Reads the value a COLUMNS key refers to.
    pub fn get(&self, column: &ColumnKey) -> Option<&Value> {
        match (self, column) {
            (RelationEntry::Record(record), ColumnKey::Field(key)) => record.get(key.field),
            (RelationEntry::Record(_), ColumnKey::Apply(_)) => None,
            (RelationEntry::Group(row), ColumnKey::Field(key)) => row.key(key.field),
            (RelationEntry::Group(row), ColumnKey::Apply(name)) => row.applied(name),
        }
    }
}

/// The rows surviving filtering, or the groups built from them.
#[derive(Clone, Debug, Default)]
pub struct Relation<'a> {
    pub entries: Vec<RelationEntry<'a>>,
}

impl<'a> Relation<'a> {
    /// Creates a relation over the records at the given positions.
    pub fn from_records(records: &'a [Record], positions: &[usize]) -> Self {
        Self {
            entries: positions
                .iter()
                .filter_map(|&pos| records.get(pos))
                .map(RelationEntry::Record)
                .collect(),
        }
    }

    /// Creates a relation from grouped rows.
    pub fn from_groups(groups: Vec<GroupRow>) -> Self {
        Self {
            entries: groups.into_iter().map(RelationEntry::Group).collect(),
        }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &RelationEntry<'a>> {
        self.entries.iter()
    }
}
