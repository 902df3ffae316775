//! Error types for the database facade.

use insight_query::{ErrorKind, QueryError};
use insight_storage::StorageError;
use thiserror::Error;

/// Any failure surfaced by [`Database`](crate::Database).
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

impl DatabaseError {
    /// Returns the HTTP status a transport layer should answer with:
    /// malformed or invalid requests are 400, a missing dataset or an
    /// oversized result is 404.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Query(err) => match err.kind() {
                ErrorKind::Grammar | ErrorKind::Semantic => 400,
                ErrorKind::ResultTooLarge => 404,
            },
            Self::Storage(StorageError::NotFound(_)) => 404,
            Self::Storage(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases: Vec<(DatabaseError, u16)> = vec![
            (QueryError::grammar("x").into(), 400),
            (QueryError::semantic("x").into(), 400),
            (QueryError::result_too_large(5000, 5001).into(), 404),
            (StorageError::NotFound("x".into()).into(), 404),
            (StorageError::Duplicate("x".into()).into(), 400),
            (StorageError::invalid_id("", "id cannot be empty").into(), 400),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err);
        }
    }

    #[test]
    fn test_display_is_transparent() {
        let err: DatabaseError = QueryError::grammar("Missing WHERE in query").into();
        assert_eq!(err.to_string(), "Invalid query: Missing WHERE in query");
    }
}
