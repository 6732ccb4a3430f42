//! Book assembly.
//!
//! [`BookAssembler`] turns each book folder of a [`Storage`] into a [`Book`]:
//!
//! 1. read and parse the root document
//! 2. extract the toctree order from the root document's raw text
//! 3. read and parse every sibling section in parallel
//! 4. once all siblings are parsed, order them with [`order_sections`]
//!
//! Books are independent and assembled in parallel too. Failures stay inside
//! their book: a folder without a root document is skipped, an unreadable
//! section is left out, and an unreadable content root yields no books.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use peta_storage::{ROOT_DOCUMENT_ID, Storage};
use rayon::prelude::*;

use crate::document::{Book, ContentDocument};
use crate::error::ContentError;
use crate::parser::parse;
use crate::section_map::{SectionMap, order_sections};
use crate::toctree::extract_order;

/// Book title used when the root document names none.
pub const DEFAULT_BOOK_TITLE: &str = "Untitled";

/// Root section title used when the root document names none.
pub const ROOT_SECTION_TITLE: &str = "Introduction";

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Assembles books from a storage backend.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use peta_content::BookAssembler;
/// use peta_storage::FsStorage;
///
/// let assembler = BookAssembler::new(FsStorage::new(PathBuf::from("_content/books")));
/// let books = assembler.assemble_all();
/// ```
pub struct BookAssembler<S> {
    storage: S,
    /// Date given to documents that don't declare one.
    today: NaiveDate,
}

impl<S: Storage> BookAssembler<S> {
    /// Create an assembler dating undated documents with today's UTC date.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            today: Utc::now().date_naive(),
        }
    }

    /// Override the processing date.
    #[must_use]
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Assemble every book under the content root, sorted by folder name.
    ///
    /// Returns an empty list if the content root can't be listed. Books that
    /// fail to assemble are logged and left out.
    pub fn assemble_all(&self) -> Vec<Book> {
        let start = Instant::now();

        let folders = match self.storage.books() {
            Ok(folders) => folders,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list books");
                return Vec::new();
            }
        };

        let books: Vec<Book> = folders
            .par_iter()
            .filter_map(|folder| self.assemble(folder))
            .collect();

        tracing::info!(
            folders = folders.len(),
            books = books.len(),
            elapsed_ms = elapsed_ms(start),
            "Books assembled"
        );
        books
    }

    /// Assemble one book, logging and swallowing failures.
    pub fn assemble(&self, book: &str) -> Option<Book> {
        self.try_assemble(book)
            .inspect_err(|e| tracing::warn!(book, error = %e, "Skipping book"))
            .ok()
    }

    /// Assemble one book.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::MissingRootDocument`] if the folder has no root
    /// document, or [`ContentError::Storage`] if the root document or the
    /// folder listing can't be read.
    pub fn try_assemble(&self, book: &str) -> Result<Book, ContentError> {
        let raw = self
            .storage
            .read(book, ROOT_DOCUMENT_ID)
            .map_err(|e| {
                if e.is_not_found() {
                    ContentError::MissingRootDocument {
                        book: book.to_owned(),
                    }
                } else {
                    ContentError::Storage(e)
                }
            })?;

        let root = parse(&raw);
        let toctree = extract_order(&raw);
        let title = root.title_or(DEFAULT_BOOK_TITLE);
        let index = root.into_document(ROOT_DOCUMENT_ID, ROOT_SECTION_TITLE, self.today);

        let ids = self.storage.documents(book)?;
        // Fan-out per section, fan-in before ordering.
        let sections: SectionMap = ids
            .par_iter()
            .filter_map(|id| self.load_section(book, id))
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        let ordered = order_sections(index, &toctree, sections);
        tracing::debug!(
            book,
            toctree_entries = toctree.len(),
            sections = ordered.len(),
            "Book assembled"
        );

        Book::from_sections(book, title, ordered).ok_or_else(|| {
            ContentError::MissingRootDocument {
                book: book.to_owned(),
            }
        })
    }

    /// Read and parse one section. Unreadable sections are logged and skipped.
    ///
    /// Untitled sections are titled by their file stem, as written.
    fn load_section(&self, book: &str, id: &str) -> Option<ContentDocument> {
        let raw = self
            .storage
            .read(book, id)
            .inspect_err(|e| tracing::warn!(book, section = id, error = %e, "Skipping section"))
            .ok()?;
        Some(parse(&raw).into_document(id, id, self.today))
    }
}

#[cfg(test)]
mod tests {
    // Assemblers are shared across rayon workers
    static_assertions::assert_impl_all!(super::BookAssembler<peta_storage::FsStorage>: Send, Sync);

    use peta_storage::{FsStorage, MockStorage};
    use pretty_assertions::assert_eq;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn assembler(storage: MockStorage) -> BookAssembler<MockStorage> {
        BookAssembler::new(storage).with_date(today())
    }

    fn section_ids(book: &Book) -> Vec<&str> {
        book.section_ids().collect()
    }

    #[test]
    fn test_toctree_order_then_remaining() {
        let storage = MockStorage::new()
            .with_document(
                "rust",
                "index",
                ":title: The Rust Book\n:author: Ferris\n\n.. toctree::\n   :maxdepth: 2\n\n   b\n   a\n   missing\n",
            )
            .with_document("rust", "a", "A text")
            .with_document("rust", "b", "B text")
            .with_document("rust", "zz-appendix", "Appendix")
            .with_document("rust", "extra", "Extra");

        let book = assembler(storage).assemble("rust").unwrap();

        assert_eq!(
            section_ids(&book),
            vec!["index", "b", "a", "extra", "zz-appendix"]
        );
        assert_eq!(book.title, "The Rust Book");
        assert_eq!(book.author, "Ferris");
        assert_eq!(book.date, "2024-03-09");
        assert_eq!(book.content, book.sections[0].nodes);
    }

    #[test]
    fn test_every_sibling_appears_once() {
        let storage = MockStorage::new()
            .with_document("b", "index", ".. toctree::\n\n   one\n   one\n   index\n   two\n")
            .with_document("b", "one", "1")
            .with_document("b", "two", "2")
            .with_document("b", "three", "3");

        let book = assembler(storage).assemble("b").unwrap();

        assert_eq!(section_ids(&book), vec!["index", "one", "two", "three"]);
    }

    #[test]
    fn test_titles_and_defaults() {
        let storage = MockStorage::new()
            .with_document("b", "index", "No metadata here.")
            .with_document("b", "getting-started", "Body only")
            .with_document("b", "with-heading", "Real Heading\n============\n\nBody");

        let book = assembler(storage).assemble("b").unwrap();

        assert_eq!(book.title, "Untitled");
        assert_eq!(book.author, "Unknown Author");
        assert_eq!(book.description, "");
        assert!(book.tags.is_empty());
        assert_eq!(book.cover_image, None);

        let titles: Vec<&str> = book.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction", "getting-started", "Real Heading"]);
    }

    #[test]
    fn test_default_date_is_utc_today() {
        let before = Utc::now().date_naive();
        let assembler = BookAssembler::new(MockStorage::new());
        let after = Utc::now().date_naive();

        assert!(assembler.today == before || assembler.today == after);
    }

    #[test]
    fn test_untitled_section_keeps_stem_verbatim() {
        let storage = MockStorage::new()
            .with_document("b", "index", "Root")
            .with_document("b", "--", "Separators only")
            .with_document("b", "api_Reference", "Body");

        let book = assembler(storage).assemble("b").unwrap();

        let titles: Vec<(&str, &str)> = book
            .sections
            .iter()
            .map(|s| (s.id.as_str(), s.title.as_str()))
            .collect();
        assert_eq!(
            titles,
            vec![("index", "Introduction"), ("--", "--"), ("api_Reference", "api_Reference")]
        );
    }

    #[test]
    fn test_missing_root_document_skips_book() {
        let storage = MockStorage::new()
            .with_document("orphan", "chapter", "No root")
            .with_document("ok", "index", "Root");

        let assembler = assembler(storage);

        assert!(assembler.assemble("orphan").is_none());
        assert!(matches!(
            assembler.try_assemble("orphan"),
            Err(ContentError::MissingRootDocument { .. })
        ));
        let books = assembler.assemble_all();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, "ok");
    }

    #[test]
    fn test_unreadable_section_is_left_out() {
        let storage = MockStorage::new()
            .with_document("b", "index", "Root")
            .with_document("b", "good", "Good")
            .with_unreadable("b", "bad");

        let book = assembler(storage).assemble("b").unwrap();

        assert_eq!(section_ids(&book), vec!["index", "good"]);
    }

    #[test]
    fn test_unreadable_root_document_is_error() {
        let storage = MockStorage::new().with_unreadable("b", "index");

        let result = assembler(storage).try_assemble("b");

        assert!(matches!(result, Err(ContentError::Storage(_))));
    }

    #[test]
    fn test_unavailable_content_root_yields_no_books() {
        let storage = MockStorage::new()
            .with_document("b", "index", "Root")
            .unavailable();

        assert!(assembler(storage).assemble_all().is_empty());
    }

    #[test]
    fn test_assemble_all_sorted_by_folder() {
        let storage = MockStorage::new()
            .with_document("zeta", "index", "Z")
            .with_document("alpha", "index", "A")
            .with_document("mid", "index", "M");

        let books = assembler(storage).assemble_all();

        let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_filesystem_book() {
        let temp_dir = tempfile::tempdir().unwrap();
        let book_dir = temp_dir.path().join("algorithms");
        std::fs::create_dir(&book_dir).unwrap();
        std::fs::write(
            book_dir.join("index.rst"),
            "---\ntitle: Algorithms\ntags: [cs, math]\ncover_image: cover.png\n---\n\nWelcome.\n\n.. toctree::\n   :caption: Chapters\n\n   sorting\n   graphs\n",
        )
        .unwrap();
        std::fs::write(book_dir.join("graphs.rst"), "Graphs\n======\n\n.. snippet-card:: bfs\n").unwrap();
        std::fs::write(book_dir.join("sorting.rst"), "Sorting\n=======\n").unwrap();
        std::fs::write(book_dir.join("hashing.rst"), "Hashing\n=======\n").unwrap();
        std::fs::write(book_dir.join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(temp_dir.path().join("empty")).unwrap();

        let assembler =
            BookAssembler::new(FsStorage::new(temp_dir.path().to_path_buf())).with_date(today());
        let books = assembler.assemble_all();

        assert_eq!(books.len(), 1);
        let book = &books[0];
        assert_eq!(book.title, "Algorithms");
        assert_eq!(book.cover_image.as_deref(), Some("cover.png"));
        assert_eq!(
            book.tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["cs", "math"]
        );
        assert_eq!(
            section_ids(book),
            vec!["index", "sorting", "graphs", "hashing"]
        );
        assert_eq!(book.sections[0].title, "Algorithms");
        assert_eq!(book.sections[2].title, "Graphs");
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let storage = MockStorage::new()
            .with_document("b", "index", ".. toctree::\n\n   z\n   y\n")
            .with_document("b", "y", "Y")
            .with_document("b", "z", "Z")
            .with_document("b", "x", "X");

        let books = assembler(storage).assemble_all();
        let json = serde_json::to_string(&books).unwrap();
        let parsed: Vec<Book> = serde_json::from_str(&json).unwrap();

        assert_eq!(section_ids(&parsed[0]), vec!["index", "z", "y", "x"]);
        assert_eq!(section_ids(&parsed[0]), section_ids(&books[0]));
    }
}
