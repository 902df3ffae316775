//! Error types for Insight core types.

use alloc::string::String;
use core::fmt;

/// Result type alias for core operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while parsing keys, kinds and patterns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A string is not of the form `<dataset>_<field>`.
    InvalidFieldKey {
        key: String,
    },
    /// The field part of a key is not a known field.
    UnknownField {
        name: String,
    },
    /// A dataset kind other than the known ones.
    UnknownDatasetKind {
        kind: String,
    },
    /// A wildcard pattern with an asterisk in the middle.
    InvalidPattern {
        pattern: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFieldKey { key } => {
                write!(f, "Invalid key '{}': expected 'idstring_field'", key)
            }
            Error::UnknownField { name } => write!(f, "Unknown field: {}", name),
            Error::UnknownDatasetKind { kind } => write!(f, "Invalid dataset kind: {}", kind),
            Error::InvalidPattern { pattern } => write!(
                f,
                "Invalid pattern '{}': asterisks are only allowed at the start or end",
                pattern
            ),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Creates an invalid field key error.
    pub fn invalid_field_key(key: impl Into<String>) -> Self {
        Error::InvalidFieldKey { key: key.into() }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Error::UnknownField { name: name.into() }
    }

    /// Creates an unknown dataset kind error.
    pub fn unknown_dataset_kind(kind: impl Into<String>) -> Self {
        Error::UnknownDatasetKind { kind: kind.into() }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
        }
    }
}
