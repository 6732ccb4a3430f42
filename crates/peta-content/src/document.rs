//! Document model and its JSON contract.
//!
//! These types are what the rendering layer consumes: a [`Book`] holds the
//! root document's metadata plus its ordered [`ContentDocument`] sections,
//! and every document is an ordered stream of [`ContentNode`]s.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One unit of a document's content stream.
///
/// Serialized internally tagged by `type`:
///
/// ```json
/// { "type": "code-block", "content": "fn main() {}", "language": "rust" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentNode {
    /// Raw prose. Inline math and emphasis markup are left for the renderer.
    Text { content: String },

    /// Source code with an optional language tag.
    CodeBlock {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },

    /// Marker pointing at an externally indexed snippet.
    ///
    /// Resolved at render time, see [`crate::resolve`].
    #[serde(alias = "snippet-card-ref")]
    SnippetReference {
        #[serde(rename = "content")]
        id: String,
    },

    /// Table of contents as written in the document. Informational only:
    /// section order comes from [`crate::extract_order`].
    Toctree {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default)]
        entries: Vec<TocEntry>,
    },

    /// Snippet inlined in full, needing no resolution.
    EmbeddedSnippet {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        content: String,
    },
}

impl ContentNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create a code block node.
    pub fn code_block(content: impl Into<String>, language: Option<String>) -> Self {
        Self::CodeBlock {
            content: content.into(),
            language,
        }
    }

    /// Create a snippet reference node.
    pub fn snippet_reference(id: impl Into<String>) -> Self {
        Self::SnippetReference { id: id.into() }
    }
}

/// Entry of a [`ContentNode::Toctree`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Display title (`Title` in `Title <target>`, else the target itself).
    pub title: String,
    /// Referenced document id.
    #[serde(default)]
    pub target: String,
}

/// Metadata of a document beyond its id and title.
///
/// Every field holds a resolved value: defaults are applied during parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub author: String,
    pub description: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub tags: BTreeSet<String>,
    pub cover_image: Option<String>,
}

/// A parsed document: a book's root page or one of its sections.
///
/// Serializes as a section, `{ id, title, content }`. The remaining metadata
/// only reaches the wire through [`Book`] for the root document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    /// File stem, or `"index"` for the root document.
    pub id: String,
    pub title: String,
    #[serde(rename = "content", default)]
    pub nodes: Vec<ContentNode>,
    #[serde(skip)]
    pub metadata: DocumentMetadata,
}

/// An assembled book.
///
/// Top-level metadata comes from the root document; `sections` starts with
/// the root document itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Book folder name.
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub date: String,
    pub tags: BTreeSet<String>,
    pub cover_image: Option<String>,
    /// Root document's nodes.
    pub content: Vec<ContentNode>,
    pub sections: Vec<ContentDocument>,
}

impl Book {
    /// Build a book from its ordered sections.
    ///
    /// `sections[0]` must be the root document: it supplies metadata and
    /// top-level content. Returns `None` when `sections` is empty.
    pub fn from_sections(
        id: impl Into<String>,
        title: impl Into<String>,
        sections: Vec<ContentDocument>,
    ) -> Option<Self> {
        let root = sections.first()?;
        let metadata = root.metadata.clone();
        let content = root.nodes.clone();

        Some(Self {
            id: id.into(),
            title: title.into(),
            author: metadata.author,
            description: metadata.description,
            date: metadata.date,
            tags: metadata.tags,
            cover_image: metadata.cover_image,
            content,
            sections,
        })
    }

    /// Section ids in reading order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }
}
