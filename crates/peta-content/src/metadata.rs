//! Leading metadata block of a document.
//!
//! Two forms are accepted at the start of a document, after optional blank
//! lines:
//!
//! ```text
//! ---                          :title: Fibonacci
//! title: Fibonacci             :author: Ada
//! tags: [math, recursion]      :tags: math, recursion
//! ---
//! ```
//!
//! YAML front matter is parsed with `serde_yaml`; the RST field list form is
//! read line by line. Unknown keys are ignored and missing keys are defaulted
//! by [`Frontmatter::resolve`], so metadata never fails a parse.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_yaml::Value;

use crate::document::DocumentMetadata;

/// Author used when a document names none.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// RST field list line: `:key: value` or `:key:`.
static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([A-Za-z][A-Za-z0-9_ -]*):(?:\s+(.*))?$").unwrap());

/// Raw metadata as written in a document. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
}

impl Frontmatter {
    /// Apply defaults, producing resolved metadata.
    ///
    /// `today` becomes the date of documents that don't declare one.
    pub fn resolve(&self, today: NaiveDate) -> DocumentMetadata {
        DocumentMetadata {
            author: self
                .author
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
            description: self.description.clone().unwrap_or_default(),
            date: self.date.clone().unwrap_or_else(|| format_date(today)),
            tags: self.tags.iter().cloned().collect(),
            cover_image: self.cover_image.clone(),
        }
    }

    /// Set a scalar field. Empty values are ignored.
    fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = match normalize_key(key).as_str() {
            "title" => &mut self.title,
            "author" => &mut self.author,
            "description" => &mut self.description,
            "date" => &mut self.date,
            "cover_image" => &mut self.cover_image,
            "tags" => {
                self.tags = split_tags(value);
                return;
            }
            _ => return,
        };
        *slot = Some(value.to_owned());
    }

    /// Set a field from a YAML value.
    fn set_yaml(&mut self, key: &str, value: &Value) {
        if let Value::Sequence(items) = value
            && normalize_key(key) == "tags"
        {
            self.tags = items.iter().filter_map(yaml_scalar).collect();
            return;
        }
        if let Some(scalar) = yaml_scalar(value) {
            self.set(key, &scalar);
        }
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Split the leading metadata block off a document.
///
/// Returns the metadata and the remaining body. Text without a metadata
/// block is returned whole.
pub(crate) fn split_metadata(raw: &str) -> (Frontmatter, &str) {
    let rest = &raw[leading_blank_len(raw)..];

    if let Some(split) = split_yaml(rest) {
        return split;
    }
    if let Some(split) = split_field_list(rest) {
        return split;
    }
    (Frontmatter::default(), raw)
}

fn leading_blank_len(text: &str) -> usize {
    text.split_inclusive('\n')
        .take_while(|line| line.trim().is_empty())
        .map(str::len)
        .sum()
}

/// `---` fenced YAML. `None` unless both fences are present and the block
/// between them is a mapping (or empty).
fn split_yaml(text: &str) -> Option<(Frontmatter, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let frontmatter = parse_yaml(&text[yaml_start..offset])?;
            return Some((frontmatter, &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// `None` when the block parses to something other than a mapping, such as
/// a heading overlined and underlined with `---`.
fn parse_yaml(yaml: &str) -> Option<Frontmatter> {
    let mut frontmatter = Frontmatter::default();
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(map)) => {
            for (key, value) in &map {
                if let Some(key) = key.as_str() {
                    frontmatter.set_yaml(key, value);
                }
            }
        }
        Ok(Value::Null) => {}
        Ok(_) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid YAML front matter, ignoring metadata");
        }
    }
    Some(frontmatter)
}

/// Consecutive `:key: value` lines. `None` if the first line isn't a field.
fn split_field_list(text: &str) -> Option<(Frontmatter, &str)> {
    let mut frontmatter = Frontmatter::default();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let Some(caps) = FIELD_RE.captures(line.trim_end()) else {
            break;
        };
        let value = caps.get(2).map_or("", |m| m.as_str());
        frontmatter.set(&caps[1], value);
        offset += line.len();
    }

    (offset > 0).then(|| (frontmatter, &text[offset..]))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('-', "_")
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Stringify a YAML scalar. Mappings, sequences and nulls yield `None`.
fn yaml_scalar(value: &Value) -> Option<String> {
    let scalar = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!scalar.is_empty()).then_some(scalar)
}
