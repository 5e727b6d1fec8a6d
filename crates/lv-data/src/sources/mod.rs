//! Sources of the four JSON documents

pub mod directory_source;
pub mod memory_source;

pub use directory_source::DirectorySource;
pub use memory_source::MemorySource;

use std::fmt;
use async_trait::async_trait;

use crate::LoadError;

/// The documents a logbook data set consists of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Logbooks,
    Boats,
    Persons,
    Destinations,
}

impl Document {
    /// All documents in load order
    pub const ALL: [Document; 4] = [
        Document::Logbooks,
        Document::Boats,
        Document::Persons,
        Document::Destinations,
    ];

    /// Short lowercase name, also the default file stem
    pub fn name(&self) -> &'static str {
        match self {
            Document::Logbooks => "logbooks",
            Document::Boats => "boats",
            Document::Persons => "persons",
            Document::Destinations => "destinations",
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for data sources
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the raw JSON text of a document
    async fn fetch(&self, document: Document) -> Result<String, LoadError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
