//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;

use crate::storage::{ROOT_DOCUMENT_ID, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// A document slot: readable content, or a simulated read failure.
#[derive(Debug, Clone)]
enum Entry {
    Content(String),
    Unreadable,
}

/// Mock storage for testing.
///
/// Stores books and documents in memory. Use the builder methods to configure
/// the mock with test data.
///
/// # Example
///
/// ```ignore
/// use peta_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_document("rust", "index", ".. toctree::\n\n   intro\n")
///     .with_document("rust", "intro", "Intro text");
///
/// assert_eq!(storage.documents("rust").unwrap(), vec!["intro"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockStorage {
    books: BTreeMap<String, BTreeMap<String, Entry>>,
    unavailable: bool,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty book folder.
    #[must_use]
    pub fn with_book(mut self, book: impl Into<String>) -> Self {
        self.books.entry(book.into()).or_default();
        self
    }

    /// Add a document to a book, creating the book if needed.
    ///
    /// Use [`ROOT_DOCUMENT_ID`] as `id` for the root document.
    #[must_use]
    pub fn with_document(
        mut self,
        book: impl Into<String>,
        id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.books
            .entry(book.into())
            .or_default()
            .insert(id.into(), Entry::Content(content.into()));
        self
    }

    /// Add a document that is listed but fails to read.
    #[must_use]
    pub fn with_unreadable(mut self, book: impl Into<String>, id: impl Into<String>) -> Self {
        self.books
            .entry(book.into())
            .or_default()
            .insert(id.into(), Entry::Unreadable);
        self
    }

    /// Make listing the content root fail.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn book(&self, book: &str) -> Result<&BTreeMap<String, Entry>, StorageError> {
        self.books.get(book).ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound)
                .with_path(book)
                .with_backend(BACKEND)
        })
    }
}

impl Storage for MockStorage {
    fn books(&self) -> Result<Vec<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied).with_backend(BACKEND));
        }
        Ok(self.books.keys().cloned().collect())
    }

    fn documents(&self, book: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .book(book)?
            .keys()
            .filter(|id| id.as_str() != ROOT_DOCUMENT_ID)
            .cloned()
            .collect())
    }

    fn read(&self, book: &str, id: &str) -> Result<String, StorageError> {
        let path = format!("{book}/{id}");
        match self.book(book)?.get(id) {
            Some(Entry::Content(content)) => Ok(content.clone()),
            Some(Entry::Unreadable) => Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND)),
            None => Err(StorageError::not_found(path).with_backend(BACKEND)),
        }
    }
}
