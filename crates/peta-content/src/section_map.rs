//! Insertion-ordered section map and the section ordering rule.

use std::collections::HashMap;

use peta_storage::ROOT_DOCUMENT_ID;

use crate::document::ContentDocument;

/// Sections of one book keyed by id, iterated in insertion order.
///
/// Taking a section out removes it from later iteration, so each section is
/// handed out at most once.
#[derive(Debug, Default)]
pub struct SectionMap {
    order: Vec<String>,
    documents: HashMap<String, ContentDocument>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section. Re-inserting an id replaces the document but keeps
    /// its original position.
    pub fn insert(&mut self, document: ContentDocument) -> Option<ContentDocument> {
        let id = document.id.clone();
        let previous = self.documents.insert(id.clone(), document);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Number of sections not yet taken.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Remove and return a section.
    pub fn take(&mut self, id: &str) -> Option<ContentDocument> {
        self.documents.remove(id)
    }

    /// Remaining sections in insertion order.
    pub fn into_remaining(mut self) -> Vec<ContentDocument> {
        self.order
            .iter()
            .filter_map(|id| self.documents.remove(id))
            .collect()
    }
}

impl FromIterator<ContentDocument> for SectionMap {
    fn from_iter<I: IntoIterator<Item = ContentDocument>>(iter: I) -> Self {
        let mut map = Self::new();
        for document in iter {
            map.insert(document);
        }
        map
    }
}

/// Order a book's sections.
///
/// 1. the root document first;
/// 2. every toctree id found in `sections`, in toctree order;
/// 3. the sections no toctree entry named, in insertion order.
///
/// Ids missing from `sections` are skipped. A section is appended once even
/// if the toctree repeats it; the root id is never appended again.
pub fn order_sections(
    root: ContentDocument,
    toctree: &[String],
    mut sections: SectionMap,
) -> Vec<ContentDocument> {
    let mut ordered = Vec::with_capacity(sections.len() + 1);
    ordered.push(root);

    for id in toctree {
        if id == ROOT_DOCUMENT_ID {
            continue;
        }
        if let Some(section) = sections.take(id) {
            ordered.push(section);
        }
    }

    ordered.extend(
        sections
            .into_remaining()
            .into_iter()
            .filter(|s| s.id != ROOT_DOCUMENT_ID),
    );
    ordered
}
