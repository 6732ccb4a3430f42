//! Book content assembly for Peta.
//!
//! Turns a folder of reStructuredText documents into a [`Book`]:
//!
//! - [`parse`] splits a raw document into metadata and [`ContentNode`]s
//! - [`extract_order`] reads the section order declared by toctree blocks
//! - [`BookAssembler`] loads every section through a
//!   [`Storage`](peta_storage::Storage) and orders them with [`order_sections`]
//! - [`resolve`] matches snippet references against the snippet index
//!
//! # Quick Start
//!
//! ```no_run
//! use peta_content::BookAssembler;
//! use peta_storage::FsStorage;
//!
//! let assembler = BookAssembler::new(FsStorage::new("_content/books".into()));
//! for book in assembler.assemble_all() {
//!     println!("{} ({} sections)", book.title, book.sections.len());
//! }
//! ```

mod assembler;
mod directive;
mod document;
mod error;
mod metadata;
mod parser;
mod section_map;
mod snippet;
mod toctree;
mod xref;

pub use assembler::{BookAssembler, DEFAULT_BOOK_TITLE, ROOT_SECTION_TITLE};
pub use document::{Book, ContentDocument, ContentNode, DocumentMetadata, TocEntry};
pub use error::ContentError;
pub use metadata::{DEFAULT_AUTHOR, Frontmatter, format_date};
pub use parser::{ParsedDocument, parse};
pub use section_map::{SectionMap, order_sections};
pub use snippet::{Snippet, SnippetFrontmatter, load_snippet_index};
pub use toctree::{ScanState, ToctreeScanner, extract_order};
pub use xref::{MatchPredicate, MatchRule, Resolution, display_title, resolve, slugify};
