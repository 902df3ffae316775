//! Execution settings.

use serde::{Deserialize, Serialize};

/// Default upper bound on the number of rows a query may return.
pub const DEFAULT_MAX_RESULTS: usize = 5000;

/// Settings applied to every executed query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// A query whose filtered (or grouped) row count exceeds this fails with
    /// a result-too-large error.
    pub max_results: usize,
}

impl ExecutionConfig {
    /// Returns a config with the given row cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
