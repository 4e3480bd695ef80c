use std::sync::LazyLock;

use regex::Regex;

use super::{MatchBudget, Matcher, NameBoundary, captures_within};
use crate::divider::{DividerWordList, DividerWordOptions};
use crate::record::{Village, strip_dots};

// The code, then an optional ordinal column, then the name.
static CODE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2}\.[0-9]{2}\.[0-9]{2}\.[0-9]{4})\s*[0-9]*\s*").expect("village code pattern")
});

/// Matches `NN.NN.NN.NNNN [ordinal] <name> [remarks]` rows.
///
/// The name ends at the first divider word (typos included) or at the end of
/// the row. A page number glued to the last word of the name is removed.
#[derive(Debug, Clone)]
pub struct VillageMatcher {
    boundary: NameBoundary,
    budget: MatchBudget,
}

impl VillageMatcher {
    pub fn new(dividers: &DividerWordList, budget: MatchBudget) -> Self {
        Self {
            boundary: NameBoundary::new(&dividers.words(&DividerWordOptions::with_typos())),
            budget,
        }
    }
}

impl Default for VillageMatcher {
    fn default() -> Self {
        Self::new(DividerWordList::builtin(), MatchBudget::default())
    }
}

/// Remove a trailing digit run that is glued to the previous word
/// (`Darul Ikhsan12` → `Darul Ikhsan`). A run preceded by whitespace is a
/// real part of the name (`Dua 2`) and stays.
pub fn strip_page_number(name: &str) -> &str {
    let digits_start = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits_start == name.len() {
        return name;
    }
    match name[..digits_start].chars().next_back() {
        Some(prev) if prev.is_whitespace() => name,
        _ => &name[..digits_start],
    }
}

impl Matcher for VillageMatcher {
    type Output = Village;

    fn pattern(&self) -> &Regex {
        &CODE_PREFIX
    }

    fn transform(&self, row: &str) -> Option<Village> {
        let deadline = self.budget.start();
        let caps = captures_within(&CODE_PREFIX, row, &deadline)?;
        let code_match = caps.get(1)?;
        let rest = &row[caps.get(0)?.end()..];

        let end = self
            .boundary
            .positions(rest, &deadline)?
            .into_iter()
            .next()?;

        let name = strip_page_number(rest[..end].trim());
        if name.is_empty() {
            return None;
        }

        let code = strip_dots(code_match.as_str());
        Some(Village {
            district_code: code[..6].to_string(),
            code,
            name: name.to_uppercase(),
        })
    }
}
