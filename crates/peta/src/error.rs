//! CLI error types.

use peta_config::ConfigError;
use peta_content::ContentError;
use peta_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),
}
