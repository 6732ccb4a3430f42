//! Toctree order extraction.
//!
//! Scans raw document text for `.. toctree::` blocks and collects the bare
//! section ids they list. The scan is a line-level state machine:
//!
//! ```text
//!            header                  blank / entry
//! Outside ──────────► InOptions ─────────────────► InEntries
//!    ▲                    │                            │
//!    └────────────────────┴── flush-left content ──────┘
//! ```
//!
//! A flush-left line ends the block and is re-examined as a possible header,
//! so adjacent toctree blocks are all collected.

/// Scanner position relative to a toctree block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Not inside a toctree block.
    Outside,
    /// After the header, before the first blank line or entry.
    InOptions,
    /// Reading entries.
    InEntries,
}

/// Incremental toctree scanner. Feed lines in document order.
#[derive(Debug, Clone)]
pub struct ToctreeScanner {
    state: ScanState,
}

impl Default for ToctreeScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToctreeScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Outside,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Consume one line, returning the entry it declares, if any.
    pub fn feed<'l>(&mut self, line: &'l str) -> Option<&'l str> {
        if self.state != ScanState::Outside && is_flush_left_content(line) {
            self.state = ScanState::Outside;
        }

        if self.state == ScanState::Outside {
            if is_toctree_header(line) {
                self.state = ScanState::InOptions;
            }
            return None;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.state = ScanState::InEntries;
            return None;
        }
        if trimmed.starts_with(':') {
            return None;
        }

        self.state = ScanState::InEntries;
        is_entry(trimmed).then_some(trimmed)
    }
}

/// Extract section ids from every toctree block, in document order.
///
/// Duplicates are kept. Option lines and prose lines (containing whitespace
/// or quotes) are skipped.
pub fn extract_order(raw: &str) -> Vec<String> {
    let mut scanner = ToctreeScanner::new();
    raw.lines()
        .filter_map(|line| scanner.feed(line))
        .map(str::to_owned)
        .collect()
}

/// `.. toctree::` with any indentation and spacing after `..`.
///
/// Text after `::` is a directive argument, which toctree ignores.
fn is_toctree_header(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("..")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .is_some_and(|rest| rest.trim_start().starts_with("toctree::"))
}

fn is_flush_left_content(line: &str) -> bool {
    line.chars().next().is_some_and(|c| !c.is_whitespace())
}

fn is_entry(trimmed: &str) -> bool {
    !trimmed.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'')
}
