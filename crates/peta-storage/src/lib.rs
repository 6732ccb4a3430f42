//! Content storage abstraction for Peta books.
//!
//! This crate provides a [`Storage`] trait for abstracting book discovery and
//! document retrieval from the underlying storage backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Parallel assembly**: every backend is `Send + Sync`
//! - **Clean separation** between book assembly logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `books()`, `documents()` and `read()` methods
//! - [`FsStorage`] implementation for a content root on the local filesystem
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use peta_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("_content/books"));
//! for book in storage.books()? {
//!     println!("{book}: {:?}", storage.documents(&book)?);
//! }
//! ```

mod fs;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStorage;
pub use storage::{ROOT_DOCUMENT_ID, Storage, StorageError, StorageErrorKind};
