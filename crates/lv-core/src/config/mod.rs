//! Viewer configuration

use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::range::DistanceRange;

/// Errors reading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Sort applied before the user clicks a column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: "date".to_string(),
            ascending: false,
        }
    }
}

/// Tunables of the logbook viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Rows per logbook table page
    pub page_size: usize,

    /// Quiet window of the search box in milliseconds
    pub debounce_ms: u64,

    /// Entities shown in ranking charts
    pub top_n: usize,

    /// Entities stacked in the time-series chart
    pub time_series_top_n: usize,

    /// Outer bounds of the distance slider in km
    pub distance_bounds: DistanceRange,

    /// Initial logbook sort
    pub initial_sort: SortSpec,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            debounce_ms: 100,
            top_n: 20,
            time_series_top_n: 10,
            distance_bounds: DistanceRange::default(),
            initial_sort: SortSpec::default(),
        }
    }
}

impl ViewerConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse a JSON config document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Search debounce window
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{ "page_size": 50 }"#).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.top_n, 20);
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert_eq!(config.initial_sort, SortSpec::default());
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = ViewerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file_reads_sort() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_sort": {{ "column": "dist", "ascending": true }} }}"#).unwrap();

        let config = ViewerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.initial_sort.column, "dist");
        assert!(config.initial_sort.ascending);
    }
}
