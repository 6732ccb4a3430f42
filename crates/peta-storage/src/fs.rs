//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading books from a content root on the local
//! filesystem:
//!
//! ```text
//! <content_root>/
//!   <book>/
//!     index.rst        root document
//!     chapter-one.rst  section "chapter-one"
//! ```

use std::fs;
use std::path::PathBuf;

use crate::storage::{ROOT_DOCUMENT_ID, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Book folders are the non-hidden sub-directories of the content root.
/// Section documents are the non-hidden files of a book folder carrying the
/// configured extension; their id is the file stem.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use peta_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("_content/books"));
/// for book in storage.books()? {
///     let root = storage.read(&book, "index")?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Directory holding one folder per book.
    content_root: PathBuf,
    /// File stem of each book's root document.
    root_document: String,
    /// Extension shared by all documents, without the leading dot.
    extension: String,
}

impl FsStorage {
    /// Create a storage using `index.rst` root documents.
    #[must_use]
    pub fn new(content_root: PathBuf) -> Self {
        Self::with_layout(content_root, "index", "rst")
    }

    /// Create a storage with a custom root document stem and extension.
    #[must_use]
    pub fn with_layout(
        content_root: PathBuf,
        root_document: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            content_root,
            root_document: root_document.into(),
            extension: extension.into(),
        }
    }

    /// Validate that an identifier names a single entry inside its parent.
    ///
    /// Rejects empty names, separators and `.`/`..` so that identifiers can't
    /// escape the content root.
    fn validate_segment(segment: &str) -> Result<(), StorageError> {
        let invalid = segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(['/', '\\']);

        if invalid {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(segment)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn book_dir(&self, book: &str) -> Result<PathBuf, StorageError> {
        Self::validate_segment(book)?;
        Ok(self.content_root.join(book))
    }

    /// Map a document id to its file path.
    fn document_path(&self, book: &str, id: &str) -> Result<PathBuf, StorageError> {
        let dir = self.book_dir(book)?;
        Self::validate_segment(id)?;
        let stem = if id == ROOT_DOCUMENT_ID {
            self.root_document.as_str()
        } else {
            id
        };
        Ok(dir.join(format!("{stem}.{}", self.extension)))
    }

    /// Extract a section id from a directory entry name.
    ///
    /// Returns `None` for hidden files, other extensions and the root document.
    fn section_id<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if file_name.starts_with('.') {
            return None;
        }
        let stem = file_name
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;
        if stem.is_empty() || stem == self.root_document || stem == ROOT_DOCUMENT_ID {
            return None;
        }
        Some(stem)
    }
}

impl Storage for FsStorage {
    fn books(&self) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(&self.content_root).map_err(|e| {
            StorageError::io(e, Some(self.content_root.clone())).with_backend(BACKEND)
        })?;

        let mut books: Vec<String> = entries
            .filter_map(Result::ok)
            // Follows symlinks
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        books.sort();
        Ok(books)
    }

    fn documents(&self, book: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.book_dir(book)?;
        let entries = fs::read_dir(&dir)
            .map_err(|e| StorageError::io(e, Some(dir.clone())).with_backend(BACKEND))?;

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                self.section_id(&name).map(str::to_owned)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn read(&self, book: &str, id: &str) -> Result<String, StorageError> {
        let path = self.document_path(book, id)?;
        fs::read_to_string(&path)
            .map_err(|e| StorageError::io(e, Some(path)).with_backend(BACKEND))
    }
}
