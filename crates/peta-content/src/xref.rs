//! Snippet cross-reference resolution.
//!
//! A [`ContentNode::SnippetReference`](crate::ContentNode::SnippetReference)
//! names a snippet loosely: by id, by secondary id, by title or by something
//! close to its title. [`resolve`] tries [`MatchRule`]s in priority order
//! against each snippet of the index and takes the first snippet any rule
//! accepts. The cascade favors finding a match over precision.
//!
//! The index may still be loading when content renders, so the caller passes
//! a readiness flag alongside it: an unmatched reference is
//! [`Resolution::Loading`] until the index is complete and
//! [`Resolution::NotFound`] after.

use std::sync::LazyLock;

use regex::Regex;

use crate::snippet::Snippet;

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// One way a reference can name a snippet, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// Reference equals the snippet id.
    Id,
    /// Reference equals `frontmatter.snippet_id`.
    SnippetId,
    /// Reference equals the front matter title or the snippet title.
    Title,
    /// Reference equals the slug of the snippet's title.
    Slug,
    /// Reference, dashes read as spaces, and the lower-cased title contain
    /// one another.
    Loose,
}

/// Predicate deciding whether a rule accepts a snippet for a reference.
pub type MatchPredicate = fn(&str, &Snippet) -> bool;

impl MatchRule {
    /// All rules, highest priority first.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::SnippetId,
        Self::Title,
        Self::Slug,
        Self::Loose,
    ];

    pub fn predicate(self) -> MatchPredicate {
        match self {
            Self::Id => matches_id,
            Self::SnippetId => matches_snippet_id,
            Self::Title => matches_title,
            Self::Slug => matches_slug,
            Self::Loose => matches_loose,
        }
    }

    pub fn matches(self, reference: &str, snippet: &Snippet) -> bool {
        (self.predicate())(reference, snippet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::SnippetId => "snippet_id",
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Loose => "loose",
        }
    }
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn matches_id(reference: &str, snippet: &Snippet) -> bool {
    snippet.id == reference
}

fn matches_snippet_id(reference: &str, snippet: &Snippet) -> bool {
    snippet.snippet_id() == Some(reference)
}

fn matches_title(reference: &str, snippet: &Snippet) -> bool {
    snippet.frontmatter_title() == Some(reference) || snippet.title.as_deref() == Some(reference)
}

fn matches_slug(reference: &str, snippet: &Snippet) -> bool {
    slugify(snippet.match_title().unwrap_or_default()) == reference
}

/// The empty string is contained in everything, so empty sides never match.
fn matches_loose(reference: &str, snippet: &Snippet) -> bool {
    let needle = reference.to_lowercase().replace('-', " ");
    let Some(title) = snippet.match_title() else {
        return false;
    };
    let hay = title.to_lowercase();
    if needle.is_empty() || hay.is_empty() {
        return false;
    }
    hay.contains(&needle) || needle.contains(&hay)
}

/// Outcome of resolving a snippet reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A snippet matched.
    Found {
        snippet: &'a Snippet,
        rule: MatchRule,
    },
    /// Nothing matched yet, but the index isn't fully loaded.
    Loading,
    /// Nothing matched in the complete index.
    NotFound,
}

impl<'a> Resolution<'a> {
    pub fn snippet(&self) -> Option<&'a Snippet> {
        match self {
            Self::Found { snippet, .. } => Some(snippet),
            Self::Loading | Self::NotFound => None,
        }
    }
}

/// Resolve a snippet reference against the index.
///
/// Snippets are tried in index order; the first one accepted by any rule
/// wins, reporting the highest-priority rule that accepted it. `loaded`
/// tells whether `snippets` is the complete index.
pub fn resolve<'a>(reference: &str, snippets: &'a [Snippet], loaded: bool) -> Resolution<'a> {
    let found = snippets.iter().find_map(|snippet| {
        MatchRule::ALL
            .into_iter()
            .find(|rule| rule.matches(reference, snippet))
            .map(|rule| Resolution::Found { snippet, rule })
    });

    match found {
        Some(resolution) => resolution,
        None if loaded => Resolution::NotFound,
        None => Resolution::Loading,
    }
}

/// Lower-case `title` and collapse every run of characters outside
/// `[a-z0-9]` into one `-`.
pub fn slugify(title: &str) -> String {
    NON_ALNUM_RE
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// Human-readable form of a reference id: dashes become spaces and every
/// word starts upper-case. `quick-sort` becomes `Quick Sort`.
pub fn display_title(reference: &str) -> String {
    let mut result = String::with_capacity(reference.len());
    let mut in_word = false;
    for c in reference.chars() {
        let c = if c == '-' { ' ' } else { c };
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !in_word {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        in_word = is_word;
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::snippet::SnippetFrontmatter;

    fn snippet(id: &str, fm_title: Option<&str>, snippet_id: Option<&str>, title: Option<&str>) -> Snippet {
        Snippet {
            id: id.to_owned(),
            frontmatter: Some(SnippetFrontmatter {
                title: fm_title.map(str::to_owned),
                snippet_id: snippet_id.map(str::to_owned),
            }),
            title: title.map(str::to_owned),
            content: Vec::new(),
        }
    }

    fn found_rule(resolution: Resolution<'_>) -> MatchRule {
        match resolution {
            Resolution::Found { rule, .. } => rule,
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_rule_id() {
        let s = snippet("fib-1", None, None, None);

        assert!(MatchRule::Id.matches("fib-1", &s));
        assert!(!MatchRule::Id.matches("fib", &s));
    }

    #[test]
    fn test_rule_snippet_id() {
        let s = snippet("fib-1", None, Some("fibonacci"), None);

        assert!(MatchRule::SnippetId.matches("fibonacci", &s));
        assert!(!MatchRule::SnippetId.matches("fib-1", &s));
    }

    #[test]
    fn test_rule_title() {
        let s = snippet("x", Some("Fibonacci Sequence"), None, Some("fib raw"));

        assert!(MatchRule::Title.matches("Fibonacci Sequence", &s));
        assert!(MatchRule::Title.matches("fib raw", &s));
        assert!(!MatchRule::Title.matches("fibonacci sequence", &s));
    }

    #[test]
    fn test_rule_slug() {
        let s = snippet("fib-1", Some("Fibonacci Sequence"), None, None);

        assert!(MatchRule::Slug.matches("fibonacci-sequence", &s));
        assert!(!MatchRule::Slug.matches("fibonacci", &s));
    }

    #[test]
    fn test_rule_slug_falls_back_to_title() {
        let s = snippet("q", None, None, Some("Quick Sort (in-place)!"));

        assert!(MatchRule::Slug.matches("quick-sort-in-place-", &s));
    }

    #[test]
    fn test_rule_loose() {
        let s = snippet("x", Some("Binary Search Trees"), None, None);

        assert!(MatchRule::Loose.matches("search", &s));
        assert!(MatchRule::Loose.matches("binary-search", &s));
        assert!(MatchRule::Loose.matches("intro-to-binary-search-trees-guide", &s));
        assert!(!MatchRule::Loose.matches("heap", &s));
    }

    #[test]
    fn test_rule_loose_ignores_empty_title() {
        let s = snippet("x", Some(""), None, None);

        assert!(!MatchRule::Loose.matches("anything", &s));
        assert!(!MatchRule::Loose.matches("", &snippet("y", Some("T"), None, None)));
    }

    #[test]
    fn test_resolve_slug_rule() {
        let snippets = vec![snippet("fib-1", Some("Fibonacci Sequence"), None, None)];

        let resolution = resolve("fibonacci-sequence", &snippets, true);

        assert_eq!(resolution.snippet().map(|s| s.id.as_str()), Some("fib-1"));
        assert_eq!(found_rule(resolution), MatchRule::Slug);
    }

    #[test]
    fn test_resolve_first_snippet_wins() {
        let snippets = vec![
            snippet("sorting-overview", Some("Sorting Overview"), None, None),
            snippet("sorting", None, None, None),
        ];

        let resolution = resolve("sorting", &snippets, true);

        assert_eq!(
            resolution.snippet().map(|s| s.id.as_str()),
            Some("sorting-overview")
        );
        assert_eq!(found_rule(resolution), MatchRule::Loose);
    }

    #[test]
    fn test_resolve_reports_highest_rule() {
        let snippets = vec![snippet("graphs", Some("graphs"), Some("graphs"), None)];

        assert_eq!(found_rule(resolve("graphs", &snippets, true)), MatchRule::Id);
    }

    #[test]
    fn test_resolve_empty_index() {
        assert_eq!(resolve("fib", &[], true), Resolution::NotFound);
        assert_eq!(resolve("fib", &[], false), Resolution::Loading);
    }

    #[test]
    fn test_resolve_no_match_depends_on_readiness() {
        let snippets = vec![snippet("heap", Some("Heaps"), None, None)];

        assert_eq!(resolve("trie", &snippets, true), Resolution::NotFound);
        assert_eq!(resolve("trie", &snippets, false), Resolution::Loading);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fibonacci Sequence"), "fibonacci-sequence");
        assert_eq!(slugify("  C++ & Rust  "), "-c-rust-");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("quick-sort"), "Quick Sort");
        assert_eq!(display_title("fib-1"), "Fib 1");
        assert_eq!(display_title("already Fine"), "Already Fine");
        assert_eq!(display_title("a.b"), "A.B");
    }
}
