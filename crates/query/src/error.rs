//! Error types surfaced by the query pipeline.

use alloc::string::String;
use core::fmt;

/// Result type alias for query operations.
pub type QueryResult<T> = core::result::Result<T, QueryError>;

/// The kind of a query failure, for callers that map errors to status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    Semantic,
    ResultTooLarge,
}

/// A query failure. Every failure aborts the whole call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The query does not follow the structural grammar.
    Grammar(String),
    /// The query is well-formed but violates a cross-field rule.
    Semantic(String),
    /// The query is valid but its result exceeds the row cap.
    ResultTooLarge {
        limit: usize,
        actual: usize,
    },
}

impl QueryError {
    /// Creates a grammar error.
    pub fn grammar(reason: impl Into<String>) -> Self {
        QueryError::Grammar(reason.into())
    }

    /// Creates a semantic error.
    pub fn semantic(reason: impl Into<String>) -> Self {
        QueryError::Semantic(reason.into())
    }

    /// Creates a result-too-large error.
    pub fn result_too_large(limit: usize, actual: usize) -> Self {
        QueryError::ResultTooLarge { limit, actual }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Grammar(_) => ErrorKind::Grammar,
            QueryError::Semantic(_) => ErrorKind::Semantic,
            QueryError::ResultTooLarge { .. } => ErrorKind::ResultTooLarge,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Grammar(reason) => write!(f, "Invalid query: {}", reason),
            QueryError::Semantic(reason) => write!(f, "Invalid query: {}", reason),
            QueryError::ResultTooLarge { limit, actual } => write!(
                f,
                "More than {} results found ({}). Try to narrow your search.",
                limit, actual
            ),
        }
    }
}

impl core::error::Error for QueryError {}
