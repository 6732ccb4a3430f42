//! Explicit markup and directive block scanning.
//!
//! Parses RST explicit markup lines (`.. name:: argument`) and measures the
//! indented block that belongs to them.

/// Explicit markup line kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Markup<'a> {
    /// `.. name:: argument`
    Directive { name: &'a str, argument: &'a str },
    /// Footnote, citation or substitution definition, kept as text.
    Definition,
    /// Comment or hyperlink target, not content.
    Comment,
}

/// A directive with its options and dedented content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectiveBlock<'a> {
    pub name: &'a str,
    pub argument: &'a str,
    /// `:key: value` lines at the head of the body.
    pub options: Vec<(&'a str, &'a str)>,
    /// Remaining body lines, dedented, without surrounding blank lines.
    pub content: Vec<&'a str>,
}

impl DirectiveBlock<'_> {
    /// Value of an option, if present and non-empty.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
    }

    /// Content lines joined with newlines.
    pub fn content_text(&self) -> String {
        self.content.join("\n")
    }
}

/// Classify a line as explicit markup.
///
/// Returns `None` for lines that don't start (after indentation) with `..`
/// followed by whitespace or end of line.
pub(crate) fn parse_markup(line: &str) -> Option<Markup<'_>> {
    let rest = line.trim_start().strip_prefix("..")?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();

    if let Some(pos) = rest.find("::") {
        let name = &rest[..pos];
        if is_valid_directive_name(name) {
            return Some(Markup::Directive {
                name,
                argument: rest[pos + 2..].trim(),
            });
        }
    }

    if rest.starts_with('[') || rest.starts_with('|') {
        Some(Markup::Definition)
    } else {
        Some(Markup::Comment)
    }
}

/// Valid names contain alphanumerics, hyphens, underscores, dots and
/// single colons (`py:function`).
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Number of leading whitespace characters.
pub(crate) fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Index one past the last line of the block opened at `lines[start]`.
///
/// The block holds every following line that is blank or indented deeper
/// than the opening line. Trailing blank lines are excluded.
pub(crate) fn block_end(lines: &[&str], start: usize) -> usize {
    let base = indentation(lines[start]);
    let mut end = start + 1;
    let mut last_content = start;

    while end < lines.len() {
        let line = lines[end];
        if is_blank(line) {
            end += 1;
            continue;
        }
        if indentation(line) <= base {
            break;
        }
        last_content = end;
        end += 1;
    }
    last_content + 1
}

/// Split a directive body into options and dedented content.
pub(crate) fn split_body<'a>(
    name: &'a str,
    argument: &'a str,
    body: &[&'a str],
) -> DirectiveBlock<'a> {
    let mut options = Vec::new();
    let mut rest = body;

    while let Some((first, tail)) = rest.split_first() {
        let Some(option) = parse_option(first) else {
            break;
        };
        options.push(option);
        rest = tail;
    }

    DirectiveBlock {
        name,
        argument,
        options,
        content: dedent(rest),
    }
}

/// `:key: value` (value may be empty).
fn parse_option(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix(':')?;
    let end = rest.find(':')?;
    let key = &rest[..end];
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, rest[end + 1..].trim()))
}

/// Remove common indentation and surrounding blank lines.
pub(crate) fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let first = lines.iter().position(|l| !is_blank(l));
    let last = lines.iter().rposition(|l| !is_blank(l));
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    let lines = &lines[first..=last];

    let common = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| leading_ws_bytes(l))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|&l| {
            if is_blank(l) {
                ""
            } else {
                l.get(common..).unwrap_or_else(|| l.trim_start())
            }
        })
        .collect()
}

/// Byte length of leading whitespace.
fn leading_ws_bytes(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
