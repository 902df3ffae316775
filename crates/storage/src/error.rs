//! Error types for dataset storage.

use insight_core::DatasetKind;
use thiserror::Error;

/// Errors raised by dataset management, ingestion and persistence.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid dataset id '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("Dataset already exists: {0}")]
    Duplicate(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("Dataset {0} contains no valid sections")]
    Empty(String),

    #[error("Dataset {id} does not match the {kind} schema at row {row}: {reason}")]
    SchemaMismatch {
        id: String,
        kind: DatasetKind,
        row: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Creates an invalid-id error.
    pub fn invalid_id<S: Into<String>>(id: S, reason: &'static str) -> Self {
        Self::InvalidId {
            id: id.into(),
            reason,
        }
    }

    /// Returns true if the error reports a missing dataset.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
