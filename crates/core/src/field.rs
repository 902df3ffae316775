//! Field enumeration and dataset-qualified field keys.
//!
//! Every column a query can name is a `FieldKey`: a dataset id and a field
//! name joined by a single underscore, e.g. `courses_avg`. The field part is
//! drawn from a closed enumeration, so a key is parsed exactly once and the
//! executor never re-splits strings.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{DatasetKind, FieldType};

/// A field name known to some dataset kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // Numeric
    Avg,
    Pass,
    Fail,
    Audit,
    Year,
    Lat,
    Lon,
    Seats,
    // String
    Dept,
    Id,
    Instructor,
    Title,
    Uuid,
    Fullname,
    Shortname,
    Number,
    Name,
    Address,
    Type,
    Furniture,
    Href,
}

impl Field {
    /// Every field, numeric ones first.
    pub const ALL: [Field; 21] = [
        Field::Avg,
        Field::Pass,
        Field::Fail,
        Field::Audit,
        Field::Year,
        Field::Lat,
        Field::Lon,
        Field::Seats,
        Field::Dept,
        Field::Id,
        Field::Instructor,
        Field::Title,
        Field::Uuid,
        Field::Fullname,
        Field::Shortname,
        Field::Number,
        Field::Name,
        Field::Address,
        Field::Type,
        Field::Furniture,
        Field::Href,
    ];

    /// Fields carried by course section records.
    pub const COURSES: [Field; 10] = [
        Field::Dept,
        Field::Id,
        Field::Avg,
        Field::Instructor,
        Field::Title,
        Field::Pass,
        Field::Fail,
        Field::Audit,
        Field::Uuid,
        Field::Year,
    ];

    /// Fields carried by room records.
    pub const ROOMS: [Field; 11] = [
        Field::Fullname,
        Field::Shortname,
        Field::Number,
        Field::Name,
        Field::Address,
        Field::Lat,
        Field::Lon,
        Field::Seats,
        Field::Type,
        Field::Furniture,
        Field::Href,
    ];

    /// Returns the field name as it appears after the underscore in a key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Avg => "avg",
            Field::Pass => "pass",
            Field::Fail => "fail",
            Field::Audit => "audit",
            Field::Year => "year",
            Field::Lat => "lat",
            Field::Lon => "lon",
            Field::Seats => "seats",
            Field::Dept => "dept",
            Field::Id => "id",
            Field::Instructor => "instructor",
            Field::Title => "title",
            Field::Uuid => "uuid",
            Field::Fullname => "fullname",
            Field::Shortname => "shortname",
            Field::Number => "number",
            Field::Name => "name",
            Field::Address => "address",
            Field::Type => "type",
            Field::Furniture => "furniture",
            Field::Href => "href",
        }
    }

    /// Returns the value type of this field.
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Avg
            | Field::Pass
            | Field::Fail
            | Field::Audit
            | Field::Year
            | Field::Lat
            | Field::Lon
            | Field::Seats => FieldType::Numeric,
            _ => FieldType::String,
        }
    }

    /// Returns true if this is a numeric field.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.field_type().is_numeric()
    }

    /// Returns the fields of the given dataset kind.
    pub fn for_kind(kind: DatasetKind) -> &'static [Field] {
        match kind {
            DatasetKind::Courses => &Self::COURSES,
            DatasetKind::Rooms => &Self::ROOMS,
        }
    }

    /// Returns true if records of `kind` carry this field.
    pub fn belongs_to(&self, kind: DatasetKind) -> bool {
        Self::for_kind(kind).contains(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| Error::unknown_field(s))
    }
}

impl serde::Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Field {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A dataset-qualified field reference, `<dataset>_<field>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    /// Dataset id prefix.
    pub dataset: String,
    /// Field within the dataset.
    pub field: Field,
}

impl FieldKey {
    /// Creates a field key.
    pub fn new(dataset: impl Into<String>, field: Field) -> Self {
        Self {
            dataset: dataset.into(),
            field,
        }
    }

    /// Parses `<dataset>_<field>`.
    ///
    /// The dataset part must be non-empty and contain no underscore, so the
    /// key contains exactly one underscore.
    pub fn parse(key: &str) -> Result<Self> {
        let (dataset, field) = key
            .split_once('_')
            .ok_or_else(|| Error::invalid_field_key(key))?;
        if dataset.is_empty() || field.contains('_') {
            return Err(Error::invalid_field_key(key));
        }
        let field = field.parse::<Field>()?;
        Ok(Self::new(dataset, field))
    }

    /// Returns the value type of the referenced field.
    #[inline]
    pub fn field_type(&self) -> FieldType {
        self.field.field_type()
    }

    /// Returns true if the referenced field is numeric.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.field.is_numeric()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.dataset, self.field)
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldKey::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_parse_field_key() {
        let key = FieldKey::parse("courses_avg").unwrap();
        assert_eq!(key.dataset, "courses");
        assert_eq!(key.field, Field::Avg);
        assert!(key.is_numeric());
        assert_eq!(key.to_string(), "courses_avg");
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(FieldKey::parse("coursesavg").is_err());
        assert!(FieldKey::parse("_avg").is_err());
        assert!(FieldKey::parse("courses_").is_err());
        assert!(FieldKey::parse("a_b_avg").is_err());
        assert!(FieldKey::parse("courses_average").is_err());
        assert!(FieldKey::parse("courses_AVG").is_err());
    }

    #[test]
    fn test_dataset_id_may_contain_spaces() {
        let key = FieldKey::parse("my set_dept").unwrap();
        assert_eq!(key.dataset, "my set");
        assert_eq!(key.field, Field::Dept);
    }

    #[test]
    fn test_field_types() {
        for field in Field::ALL {
            let numeric = matches!(
                field,
                Field::Avg
                    | Field::Pass
                    | Field::Fail
                    | Field::Audit
                    | Field::Year
                    | Field::Lat
                    | Field::Lon
                    | Field::Seats
            );
            assert_eq!(field.is_numeric(), numeric, "{}", field);
        }
    }

    #[test]
    fn test_kind_membership() {
        assert!(Field::Avg.belongs_to(DatasetKind::Courses));
        assert!(!Field::Avg.belongs_to(DatasetKind::Rooms));
        assert!(Field::Seats.belongs_to(DatasetKind::Rooms));
        assert!(!Field::Seats.belongs_to(DatasetKind::Courses));
        // Every field belongs to exactly one kind.
        for field in Field::ALL {
            let kinds = DatasetKind::ALL
                .iter()
                .filter(|kind| field.belongs_to(**kind))
                .count();
            assert_eq!(kinds, 1, "{}", field);
        }
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
    }
}
