//! Field and dataset type definitions.

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

/// The value type carried by a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Numeric field, compared with LT/GT/EQ and aggregatable by MAX/MIN/AVG/SUM.
    Numeric,
    /// String field, compared with IS.
    String,
}

impl FieldType {
    /// Returns true for numeric fields.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Numeric)
    }
}

/// The kind of a dataset, which fixes its field schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    /// Course sections.
    Courses,
    /// Rooms, with building data.
    Rooms,
}

impl DatasetKind {
    /// All known dataset kinds.
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Courses, DatasetKind::Rooms];

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Courses => "courses",
            DatasetKind::Rooms => "rooms",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "courses" => Ok(DatasetKind::Courses),
            "rooms" => Ok(DatasetKind::Rooms),
            other => Err(Error::unknown_dataset_kind(other)),
        }
    }
}

impl serde::Serialize for DatasetKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for DatasetKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <alloc::string::String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
