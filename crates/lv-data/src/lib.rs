//! Data model, sources and loading for the logbook viewer

pub mod config;
pub mod date;
pub mod model;
pub mod sources;
pub mod store;

use std::path::PathBuf;
use thiserror::Error;

// Re-exports
pub use config::SourceConfig;
pub use date::LogDate;
pub use model::{Boat, Destination, DisplayName, LogbookEntry, LogbookRow, Person, UNKNOWN};
pub use sources::{DataSource, DirectorySource, Document, MemorySource};
pub use store::DataStore;

/// Errors that abort loading the data set.
///
/// Loading is all-or-nothing: there is no partially loaded store.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {document} from {}: {source}", .path.display())]
    Io {
        document: Document,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {document}: {source}")]
    Parse {
        document: Document,
        #[source]
        source: serde_json::Error,
    },

    #[error("{document} document is missing")]
    Missing { document: Document },
}

impl LoadError {
    /// The document that failed
    pub fn document(&self) -> Document {
        match self {
            LoadError::Io { document, .. }
            | LoadError::Parse { document, .. }
            | LoadError::Missing { document } => *document,
        }
    }
}
