//! Documents held in memory

use ahash::AHashMap;
use async_trait::async_trait;

use crate::LoadError;
use super::{DataSource, Document};

/// In-memory documents, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: AHashMap<Document, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document
    pub fn with(mut self, document: Document, json: impl Into<String>) -> Self {
        self.documents.insert(document, json.into());
        self
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(&self, document: Document) -> Result<String, LoadError> {
        self.documents
            .get(&document)
            .cloned()
            .ok_or(LoadError::Missing { document })
    }

    fn source_name(&self) -> &str {
        "memory"
    }
}
