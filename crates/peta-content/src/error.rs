//! Error types for content assembly and snippet loading.

use std::path::PathBuf;

use peta_storage::StorageError;

/// Content pipeline error.
///
/// Soft failures (a missing metadata key, a dangling toctree entry, one
/// unreadable section) never surface here: they are defaulted or logged.
/// This type covers failures a caller asked about directly, such as
/// assembling one named book or loading the snippet index.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A book folder exists but has no root document.
    #[error("Book '{book}' has no root document")]
    MissingRootDocument {
        /// Book folder name.
        book: String,
    },

    /// Snippet index file does not exist.
    #[error("Snippet index not found: {}", .0.display())]
    SnippetIndexNotFound(PathBuf),

    /// I/O error while reading a file.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Storage backend error.
    #[error("{0}")]
    Storage(#[from] StorageError),
}
