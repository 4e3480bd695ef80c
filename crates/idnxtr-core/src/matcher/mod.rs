//! Row grammars for the four entity kinds.
//!
//! Each matcher compiles its patterns once and is then applied row by row.
//! Patterns use the `regex` crate, whose search time is linear in the row
//! length. The grammars have no lookahead; where a name ends is found by an
//! explicit scan over candidate boundaries ([`NameBoundary`]). Both the search and the scan run under a
//! [`MatchBudget`]: when it runs out the row is treated as a non-match.

mod district;
mod island;
mod regency;
mod village;

use std::time::{Duration, Instant};

use regex::{Captures, Regex};

use crate::divider::DividerPrefix;

pub use district::DistrictMatcher;
pub use island::IslandMatcher;
pub use regency::RegencyMatcher;
pub use village::VillageMatcher;

/// A row grammar plus its record transform.
pub trait Matcher {
    /// The record produced for a matching row.
    type Output;

    /// The row pattern (the anchoring part of the grammar).
    fn pattern(&self) -> &Regex;

    /// Match `row` and build a record, or `None` when the row does not match.
    fn transform(&self, row: &str) -> Option<Self::Output>;

    /// Whether `row` yields a record.
    fn is_match(&self, row: &str) -> bool {
        self.transform(row).is_some()
    }
}

/// Time allowed for matching one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBudget {
    timeout: Duration,
}

impl MatchBudget {
    /// 500ms, the budget used when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

    /// A budget of `timeout` per row.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The per-row timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start the clock for one row.
    pub fn start(&self) -> Deadline {
        Deadline {
            started: Instant::now(),
            timeout: self.timeout,
        }
    }
}

impl Default for MatchBudget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

/// A running per-row clock.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    timeout: Duration,
}

impl Deadline {
    /// Whether the budget is used up.
    pub fn expired(&self) -> bool {
        self.started.elapsed() > self.timeout
    }
}

/// Run `re` on `text`, discarding the result if the budget ran out.
pub(crate) fn captures_within<'t>(
    re: &Regex,
    text: &'t str,
    deadline: &Deadline,
) -> Option<Captures<'t>> {
    let caps = re.captures(text);
    if deadline.expired() {
        tracing::debug!(len = text.len(), "match budget exceeded, row skipped");
        return None;
    }
    caps
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Finds where an area name may end: at the end of the row, or at a
/// whitespace character followed by a divider word.
#[derive(Debug, Clone)]
pub(crate) struct NameBoundary {
    divider: DividerPrefix,
}

impl NameBoundary {
    pub(crate) fn new(words: &[String]) -> Self {
        Self {
            divider: DividerPrefix::new(words),
        }
    }

    /// Byte offsets (> 0, ascending) in `text` where a name may end.
    ///
    /// Names never cross a line terminator, so the end of `text` only counts
    /// when the first line reaches it. Returns `None` if the budget runs out.
    pub(crate) fn positions(&self, text: &str, deadline: &Deadline) -> Option<Vec<usize>> {
        let line_end = text
            .char_indices()
            .find(|&(_, c)| is_line_terminator(c))
            .map_or(text.len(), |(i, _)| i);

        let mut positions = Vec::new();
        for (i, c) in text.char_indices() {
            if i > line_end {
                break;
            }
            if i == 0 || !c.is_whitespace() {
                continue;
            }
            if deadline.expired() {
                tracing::debug!(len = text.len(), "match budget exceeded, row skipped");
                return None;
            }
            if self.divider.is_match(&text[i + c.len_utf8()..]) {
                positions.push(i);
            }
        }

        if line_end == text.len() && !text.is_empty() {
            positions.push(text.len());
        }
        Some(positions)
    }
}
