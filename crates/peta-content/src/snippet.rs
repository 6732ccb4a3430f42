//! Snippet index model and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::ContentNode;
use crate::error::ContentError;

/// Reusable content indexed separately from books.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<SnippetFrontmatter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentNode>,
}

/// Snippet metadata carried in the index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Secondary identifier references may use instead of `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_id: Option<String>,
}

impl Snippet {
    /// Front matter title.
    pub fn frontmatter_title(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.title.as_deref()
    }

    /// Secondary identifier from front matter.
    pub fn snippet_id(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.snippet_id.as_deref()
    }

    /// Title used for matching: front matter title, else the snippet title.
    /// Empty titles count as absent.
    pub fn match_title(&self) -> Option<&str> {
        self.frontmatter_title()
            .filter(|t| !t.is_empty())
            .or_else(|| self.title.as_deref().filter(|t| !t.is_empty()))
    }

    /// Title to show: [`Snippet::match_title`], else the formatted id.
    pub fn display_title(&self) -> String {
        self.match_title()
            .map_or_else(|| crate::xref::display_title(&self.id), str::to_owned)
    }
}

/// On-disk index: `{ "items": [...] }` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexFile {
    Wrapped { items: Vec<Snippet> },
    Bare(Vec<Snippet>),
}

/// Load the snippet index from a JSON file.
///
/// # Errors
///
/// Returns [`ContentError::SnippetIndexNotFound`] if the file doesn't exist,
/// [`ContentError::Io`] if it can't be read and [`ContentError::Json`] if it
/// isn't a valid index.
pub fn load_snippet_index(path: &Path) -> Result<Vec<Snippet>, ContentError> {
    if !path.exists() {
        return Err(ContentError::SnippetIndexNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let index: IndexFile = serde_json::from_str(&content).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let snippets = match index {
        IndexFile::Wrapped { items } => items,
        IndexFile::Bare(items) => items,
    };
    tracing::debug!(path = %path.display(), count = snippets.len(), "Snippet index loaded");
    Ok(snippets)
}
