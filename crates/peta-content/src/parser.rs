//! Document parser.
//!
//! Turns raw document text into metadata plus an ordered stream of
//! [`ContentNode`]s:
//!
//! - blank-line separated paragraphs become [`ContentNode::Text`]
//! - `.. code-block:: lang`, backtick fences and `::` literal blocks become
//!   [`ContentNode::CodeBlock`]
//! - `.. math::` becomes a `$$`-delimited text node
//! - `.. toctree::`, `.. snippet-card::` and `.. snippet::` become their
//!   dedicated nodes
//! - any other directive is kept verbatim as text
//!
//! Parsing is a pure function of its input and never fails.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::directive::{
    DirectiveBlock, Markup, block_end, dedent, is_blank, parse_markup, split_body,
};
use crate::document::{ContentDocument, ContentNode, TocEntry};
use crate::metadata::{Frontmatter, split_metadata};

/// Toctree entry with explicit title: `Title <target>`.
static TOC_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\S)\s*<([^<>]+)>$").unwrap());

/// Characters RST accepts for section title adornment.
const ADORNMENT_CHARS: &[char] = &[
    '=', '-', '~', '^', '*', '#', '+', '`', ':', '.', '\'', '"', '_',
];

/// Result of parsing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Leading metadata block, unresolved.
    pub frontmatter: Frontmatter,
    /// First section heading of the body, if any.
    pub heading: Option<String>,
    pub nodes: Vec<ContentNode>,
}

impl ParsedDocument {
    /// Resolve the title: metadata title, then first heading, then `fallback`.
    pub fn title_or(&self, fallback: &str) -> String {
        self.frontmatter
            .title
            .clone()
            .or_else(|| self.heading.clone())
            .unwrap_or_else(|| fallback.to_owned())
    }

    /// Convert into a [`ContentDocument`] with defaults applied.
    pub fn into_document(
        self,
        id: impl Into<String>,
        fallback_title: &str,
        today: NaiveDate,
    ) -> ContentDocument {
        let title = self.title_or(fallback_title);
        ContentDocument {
            id: id.into(),
            title,
            metadata: self.frontmatter.resolve(today),
            nodes: self.nodes,
        }
    }
}

/// Parse raw document text.
pub fn parse(raw: &str) -> ParsedDocument {
    let (frontmatter, body) = split_metadata(raw);
    let lines: Vec<&str> = body.lines().collect();

    ParsedDocument {
        frontmatter,
        heading: find_heading(&lines),
        nodes: NodeSplitter::new(&lines).split(),
    }
}

/// Line-by-line node builder.
struct NodeSplitter<'a> {
    lines: &'a [&'a str],
    pos: usize,
    paragraph: Vec<&'a str>,
    nodes: Vec<ContentNode>,
}

impl<'a> NodeSplitter<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            pos: 0,
            paragraph: Vec::new(),
            nodes: Vec::new(),
        }
    }

    fn split(mut self) -> Vec<ContentNode> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];

            if is_blank(line) {
                if !self.literal_block() {
                    self.flush_paragraph();
                    self.pos += 1;
                }
            } else if let Some(fence) = self.fence_at(line) {
                self.flush_paragraph();
                self.fenced_block(&fence);
            } else if let Some(markup) = parse_markup(line) {
                self.flush_paragraph();
                self.explicit_markup(markup);
            } else {
                self.paragraph.push(line);
                self.pos += 1;
            }
        }

        self.flush_paragraph();
        self.nodes
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join("\n");
        self.paragraph.clear();
        self.nodes.push(ContentNode::text(text));
    }

    /// A fence can't directly follow paragraph text: there it is a heading
    /// underline.
    fn fence_at(&self, line: &str) -> Option<Fence> {
        if self.paragraph.is_empty() {
            Fence::open(line)
        } else {
            None
        }
    }

    fn fenced_block(&mut self, fence: &Fence) {
        let start = self.pos + 1;
        let close = (start..self.lines.len())
            .find(|&i| fence.closes(self.lines[i]))
            .unwrap_or(self.lines.len());

        let content = self.lines[start..close].join("\n");
        self.nodes
            .push(ContentNode::code_block(content, fence.language.clone()));
        self.pos = close + 1;
    }

    /// Literal block after a paragraph ending in `::`.
    ///
    /// Called on the blank line following the paragraph. Returns `false`
    /// when no indented block follows.
    fn literal_block(&mut self) -> bool {
        let expects_literal = self
            .paragraph
            .last()
            .is_some_and(|l| l.trim_end().ends_with("::"));
        if !expects_literal {
            return false;
        }

        let end = block_end(self.lines, self.pos - 1);
        if end <= self.pos {
            return false;
        }

        let content = dedent(&self.lines[self.pos..end]).join("\n");
        let text = self.paragraph.join("\n");
        self.paragraph.clear();
        if let Some(text) = collapse_literal_marker(&text) {
            self.nodes.push(ContentNode::text(text));
        }
        self.nodes.push(ContentNode::code_block(content, None));
        self.pos = end;
        true
    }

    fn explicit_markup(&mut self, markup: Markup<'a>) {
        let end = block_end(self.lines, self.pos);
        let raw = &self.lines[self.pos..end];

        match markup {
            Markup::Comment => {}
            Markup::Definition => self.nodes.push(ContentNode::text(raw.join("\n"))),
            Markup::Directive { name, argument } => {
                let block = split_body(name, argument, &raw[1..]);
                let node =
                    directive_node(&block).unwrap_or_else(|| ContentNode::text(raw.join("\n")));
                self.nodes.push(node);
            }
        }
        self.pos = end;
    }
}

/// Node for a known directive. `None` keeps the directive as raw text.
fn directive_node(block: &DirectiveBlock<'_>) -> Option<ContentNode> {
    match block.name {
        "code-block" | "code" | "sourcecode" => Some(ContentNode::code_block(
            block.content_text(),
            non_empty(block.argument),
        )),
        "math" => {
            let argument = Some(block.argument.trim()).filter(|a| !a.is_empty());
            let formula: Vec<&str> = argument
                .into_iter()
                .chain(block.content.iter().copied())
                .collect();
            Some(ContentNode::text(format!("$$\n{}\n$$", formula.join("\n"))))
        }
        "toctree" => Some(ContentNode::Toctree {
            caption: block.option("caption").map(str::to_owned),
            entries: block.content.iter().filter_map(|l| toc_entry(l)).collect(),
        }),
        "snippet-card" | "snippet-ref" => {
            let id = non_empty(block.argument)
                .or_else(|| block.content.iter().find_map(|l| non_empty(l)))?;
            Some(ContentNode::SnippetReference { id })
        }
        "snippet" | "embedded-snippet" => Some(ContentNode::EmbeddedSnippet {
            id: non_empty(block.argument)
                .or_else(|| block.option("id").map(str::to_owned))
                .unwrap_or_default(),
            title: block.option("title").map(str::to_owned),
            content: block.content_text(),
        }),
        _ => None,
    }
}

fn toc_entry(line: &str) -> Option<TocEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let entry = match TOC_ENTRY_RE.captures(line) {
        Some(caps) => TocEntry {
            title: caps[1].to_owned(),
            target: caps[2].trim().to_owned(),
        },
        None => TocEntry {
            title: line.to_owned(),
            target: line.to_owned(),
        },
    };
    Some(entry)
}

/// Apply the RST `::` rule to a paragraph introducing a literal block.
///
/// `Example::` becomes `Example:`, `Example ::` becomes `Example`, and a
/// paragraph that is only `::` disappears.
fn collapse_literal_marker(text: &str) -> Option<String> {
    let text = text.trim_end();
    let prefix = text.strip_suffix("::").unwrap_or(text);
    if prefix.trim().is_empty() {
        return None;
    }
    if prefix.ends_with(char::is_whitespace) {
        Some(prefix.trim_end().to_owned())
    } else {
        Some(format!("{prefix}:"))
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

/// Opening code fence: three or more backticks plus an optional info string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fence {
    len: usize,
    language: Option<String>,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let len = trimmed.chars().take_while(|&c| c == '`').count();
        if len < 3 {
            return None;
        }
        let info = trimmed[len..].trim();
        if info.contains('`') {
            return None;
        }
        Some(Self {
            len,
            language: info.split_whitespace().next().map(str::to_owned),
        })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let count = trimmed.chars().take_while(|&c| c == '`').count();
        count >= self.len && count == trimmed.len()
    }
}

/// First section title: a text line underlined by an adornment at least as
/// long as the text, at the start of a block.
fn find_heading(lines: &[&str]) -> Option<String> {
    for (i, pair) in lines.windows(2).enumerate() {
        let (text, underline) = (pair[0], pair[1]);
        let block_start = i == 0 || is_blank(lines[i - 1]) || adornment_len(lines[i - 1]).is_some();
        if !block_start
            || is_blank(text)
            || text.starts_with(char::is_whitespace)
            || adornment_len(text).is_some()
            || parse_markup(text).is_some()
        {
            continue;
        }

        let title = text.trim();
        if adornment_len(underline).is_some_and(|len| len >= title.chars().count()) {
            return Some(title.to_owned());
        }
    }
    None
}

/// Length of an adornment line, `None` if the line isn't one.
fn adornment_len(line: &str) -> Option<usize> {
    let trimmed = line.trim_end();
    let first = trimmed.chars().next()?;
    if !ADORNMENT_CHARS.contains(&first) || !trimmed.chars().all(|c| c == first) {
        return None;
    }
    Some(trimmed.chars().count())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_paragraphs_become_text_nodes() {
        let parsed = parse("First line\nsecond line with :math:`x^2`\n\n\nNext *para*.\n");

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text("First line\nsecond line with :math:`x^2`"),
                ContentNode::text("Next *para*."),
            ]
        );
    }

    #[test]
    fn test_code_block_directive() {
        let raw = "Intro\n\n.. code-block:: python\n   :linenos:\n\n   def f():\n       return 1\n\nAfter\n";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text("Intro"),
                ContentNode::code_block("def f():\n    return 1", Some("python".to_owned())),
                ContentNode::text("After"),
            ]
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let raw = "```rust\nfn main() {\n\n    println!(\"hi\");\n}\n```\nText";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::code_block(
                    "fn main() {\n\n    println!(\"hi\");\n}",
                    Some("rust".to_owned())
                ),
                ContentNode::text("Text"),
            ]
        );
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let parsed = parse("````\ncode\n```\nmore");

        assert_eq!(
            parsed.nodes,
            vec![ContentNode::code_block("code\n```\nmore", None)]
        );
    }

    #[test]
    fn test_literal_block() {
        let raw = "Example::\n\n    x = 1\n    y = 2\n\nDone ::\n\n  z\n\n::\n\n  w\n";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text("Example:"),
                ContentNode::code_block("x = 1\ny = 2", None),
                ContentNode::text("Done"),
                ContentNode::code_block("z", None),
                ContentNode::code_block("w", None),
            ]
        );
    }

    #[test]
    fn test_double_colon_without_block_is_text() {
        let parsed = parse("Just text::\n\nNot indented");

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text("Just text::"),
                ContentNode::text("Not indented"),
            ]
        );
    }

    #[test]
    fn test_math_directive() {
        let parsed = parse(".. math::\n\n   a^2 + b^2 = c^2\n");

        assert_eq!(
            parsed.nodes,
            vec![ContentNode::text("$$\na^2 + b^2 = c^2\n$$")]
        );
    }

    #[test]
    fn test_toctree_node() {
        let raw = ".. toctree::\n   :caption: Contents\n   :maxdepth: 2\n\n   intro\n   Advanced Topics <advanced>\n";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![ContentNode::Toctree {
                caption: Some("Contents".to_owned()),
                entries: vec![
                    TocEntry {
                        title: "intro".to_owned(),
                        target: "intro".to_owned(),
                    },
                    TocEntry {
                        title: "Advanced Topics".to_owned(),
                        target: "advanced".to_owned(),
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_snippet_nodes() {
        let raw = ".. snippet-card:: fibonacci-sequence\n\n.. snippet-card::\n\n   quick-sort\n\n.. snippet:: hello\n   :title: Hello World\n\n   print('hello')\n";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::snippet_reference("fibonacci-sequence"),
                ContentNode::snippet_reference("quick-sort"),
                ContentNode::EmbeddedSnippet {
                    id: "hello".to_owned(),
                    title: Some("Hello World".to_owned()),
                    content: "print('hello')".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_unknown_directive_kept_verbatim() {
        let raw = ".. note::\n\n   Be careful.\n\nAfter";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text(".. note::\n\n   Be careful."),
                ContentNode::text("After"),
            ]
        );
    }

    #[test]
    fn test_comments_dropped_definitions_kept() {
        let raw = ".. this is a comment\n   spanning lines\n\n.. _label:\n\n.. [1] A footnote.\n\nText";

        let parsed = parse(raw);

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text(".. [1] A footnote."),
                ContentNode::text("Text"),
            ]
        );
    }

    #[test]
    fn test_directive_interrupts_paragraph() {
        let parsed = parse("Read this:\n.. snippet-card:: intro\nThen more");

        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text("Read this:"),
                ContentNode::snippet_reference("intro"),
                ContentNode::text("Then more"),
            ]
        );
    }

    #[test]
    fn test_heading_title() {
        let parsed = parse("=========\nOverlined\n=========\n\nText");
        assert_eq!(parsed.heading.as_deref(), Some("Overlined"));

        let parsed = parse("Intro text\n\nChapter One\n~~~~~~~~~~~\n\nBody");
        assert_eq!(parsed.heading.as_deref(), Some("Chapter One"));
        assert_eq!(
            parsed.nodes,
            vec![
                ContentNode::text("Intro text"),
                ContentNode::text("Chapter One\n~~~~~~~~~~~"),
                ContentNode::text("Body"),
            ]
        );

        let parsed = parse("Too long a title\n===\n");
        assert_eq!(parsed.heading, None);
    }

    #[test]
    fn test_title_precedence() {
        let with_meta = parse(":title: From Meta\n\nHeading\n=======\n");
        assert_eq!(with_meta.title_or("fallback"), "From Meta");

        let with_heading = parse("Heading\n=======\n");
        assert_eq!(with_heading.title_or("fallback"), "Heading");

        let bare = parse("just text");
        assert_eq!(bare.title_or("fallback"), "fallback");
    }

    #[test]
    fn test_document_without_metadata_gets_defaults() {
        let doc = parse("Plain text").into_document("getting-started", "getting-started", today());

        assert_eq!(doc.id, "getting-started");
        assert_eq!(doc.title, "getting-started");
        assert_eq!(doc.metadata.author, "Unknown Author");
        assert_eq!(doc.metadata.date, "2024-03-09");
        assert!(doc.metadata.tags.is_empty());
        assert_eq!(doc.metadata.cover_image, None);
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse("");

        assert!(parsed.nodes.is_empty());
        assert_eq!(parsed.heading, None);
        assert_eq!(parsed.frontmatter, Frontmatter::default());
    }

    #[test]
    fn test_front_matter_not_in_nodes() {
        let parsed = parse("---\ntitle: T\n---\n\nBody");

        assert_eq!(parsed.frontmatter.title.as_deref(), Some("T"));
        assert_eq!(parsed.nodes, vec![ContentNode::text("Body")]);
    }

    #[test]
    fn test_dash_overlined_heading_is_not_front_matter() {
        let parsed = parse("---\nIntro\n---\n\nBody");

        assert_eq!(parsed.frontmatter, Frontmatter::default());
        assert_eq!(
            parsed.nodes,
            vec![ContentNode::text("---\nIntro\n---"), ContentNode::text("Body")]
        );

        let parsed = parse("---\nHi\n---\n\nBody");
        assert_eq!(parsed.heading.as_deref(), Some("Hi"));
        assert_eq!(parsed.title_or("fallback"), "Hi");
    }
}
