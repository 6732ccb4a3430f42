//! Storage trait and error types.
//!
//! Provides the [`Storage`] trait for abstracting book discovery and document
//! retrieval, along with [`StorageError`] for unified error handling across
//! backends.
//!
//! # Identifier Convention
//!
//! Storage methods take identifiers, not file paths:
//! - `book` - name of a book folder under the content root (e.g. `"rust-book"`)
//! - `id` - document identifier inside a book: the file stem for section files
//!   (e.g. `"getting-started"`), or [`ROOT_DOCUMENT_ID`] for the book's root page
//!
//! Storage implementations handle the mapping from identifiers to their
//! internal storage format.

use std::path::PathBuf;

/// Identifier of a book's root document, regardless of its file name on disk.
pub const ROOT_DOCUMENT_ID: &str = "index";

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid book or document identifier.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// Whether this error means the resource is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for book discovery and document retrieval.
///
/// The content root holds one folder per book. Each book folder holds a root
/// document plus zero or more sibling section documents sharing one extension.
/// Implementations must be safe to call from several threads at once: books
/// and their sections are read in parallel.
pub trait Storage: Send + Sync {
    /// List book folder names under the content root, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the content root is missing or unreadable.
    fn books(&self) -> Result<Vec<String>, StorageError>;

    /// List section document ids of a book, sorted lexicographically.
    ///
    /// The root document is never part of the listing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the book folder can't be listed.
    fn documents(&self, book: &str) -> Result<Vec<String>, StorageError>;

    /// Read the raw text of a document.
    ///
    /// Pass [`ROOT_DOCUMENT_ID`] as `id` to read the book's root document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document doesn't exist or can't be read.
    fn read(&self, book: &str, id: &str) -> Result<String, StorageError>;
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert!(err.path.as_deref().is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_not_found() {
        let err = StorageError::not_found("/books/rust");

        assert!(err.is_not_found());
        assert_eq!(err.path.as_deref(), Some(Path::new("/books/rust")));
    }

    #[test]
    fn test_storage_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound).with_source(io_err);

        assert_eq!(err.to_string(), "Not found: file not found");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_error_io_kinds() {
        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            Some(PathBuf::from("/books")),
        );
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("/books")));

        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            None,
        );
        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);

        let err = StorageError::io(std::io::Error::other("boom"), None);
        assert_eq!(err.kind, StorageErrorKind::Other);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_storage_error_display_simple() {
        let err = StorageError::new(StorageErrorKind::InvalidPath);

        assert_eq!(err.to_string(), "Invalid path");
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("/books/rust/index.rst")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: /books/rust/index.rst)"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
