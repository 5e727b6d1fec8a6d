//! Source file configuration

use std::path::Path;
use serde::{Serialize, Deserialize};
use lv_core::ConfigError;

use crate::sources::Document;

/// File names of the four documents inside a data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub logbooks: String,
    pub boats: String,
    pub persons: String,
    pub destinations: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            logbooks: "logbooks.json".to_string(),
            boats: "boats.json".to_string(),
            persons: "persons.json".to_string(),
            destinations: "destinations.json".to_string(),
        }
    }
}

impl SourceConfig {
    /// Load a JSON file; missing keys keep their default names
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// File name configured for `document`
    pub fn file_name(&self, document: Document) -> &str {
        match document {
            Document::Logbooks => &self.logbooks,
            Document::Boats => &self.boats,
            Document::Persons => &self.persons,
            Document::Destinations => &self.destinations,
        }
    }
}
