//! Database configuration.

use std::path::PathBuf;

use insight_query::ExecutionConfig;
use serde::{Deserialize, Serialize};

/// Settings for a [`Database`](crate::Database).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory datasets are persisted to and reloaded from. `None` keeps
    /// everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Query execution settings.
    pub execution: ExecutionConfig,
}

impl DatabaseConfig {
    /// Returns an in-memory configuration with default execution settings.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Sets the persistence directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Sets the execution settings.
    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    /// Parses a configuration from JSON; absent fields take their defaults.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.execution.max_results, 5000);
    }

    #[test]
    fn test_from_json() {
        let config =
            DatabaseConfig::from_json(r#"{"data_dir": "/var/insight", "execution": {"max_results": 100}}"#)
                .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/insight")));
        assert_eq!(config.execution.max_results, 100);

        assert_eq!(DatabaseConfig::from_json("{}").unwrap(), DatabaseConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = DatabaseConfig::in_memory()
            .with_data_dir("data")
            .with_execution(ExecutionConfig::default().with_max_results(10));
        assert_eq!(config.data_dir, Some(PathBuf::from("data")));
        assert_eq!(config.execution.max_results, 10);
    }
}
