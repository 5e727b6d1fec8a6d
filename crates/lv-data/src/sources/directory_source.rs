//! Documents read from a directory on disk

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tracing::debug;

use crate::config::SourceConfig;
use crate::LoadError;
use super::{DataSource, Document};

/// Reads `logbooks.json`, `boats.json`, ... from one directory
pub struct DirectorySource {
    root: PathBuf,
    config: SourceConfig,
    source_name: String,
}

impl DirectorySource {
    /// Create a source over `root` with the default file names
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, SourceConfig::default())
    }

    /// Create a source over `root` with custom file names
    pub fn with_config(root: impl Into<PathBuf>, config: SourceConfig) -> Self {
        let root = root.into();
        let source_name = root.display().to_string();
        Self { root, config, source_name }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a document
    pub fn path_of(&self, document: Document) -> PathBuf {
        self.root.join(self.config.file_name(document))
    }
}

#[async_trait]
impl DataSource for DirectorySource {
    async fn fetch(&self, document: Document) -> Result<String, LoadError> {
        let path = self.path_of(document);
        debug!("Reading {} from {}", document, path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::Missing { document }),
            Err(source) => Err(LoadError::Io { document, path, source }),
        }
    }

    fn source_name(&self) -> &str {
        &self.source_name
    }
}
