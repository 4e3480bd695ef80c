use std::sync::LazyLock;

use regex::Regex;

use super::{MatchBudget, Matcher, captures_within};
use crate::record::{Regency, strip_dots};

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:KAB\.?|KOTA)\s[A-Z. ]+)\s.+([0-9]{2}\.[0-9]{2})\s.+$")
        .expect("regency row pattern")
});

static KAB_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^KAB\.?\s+").expect("regency label pattern"));

/// Matches merged regency rows: `KAB. <NAME> ... NN.NN ...` or
/// `KOTA <NAME> ... NN.NN ...`.
///
/// The code is the last `NN.NN` token followed by more text, since the
/// leading columns hold areas and populations.
#[derive(Debug, Clone, Default)]
pub struct RegencyMatcher {
    budget: MatchBudget,
}

impl RegencyMatcher {
    pub fn new(budget: MatchBudget) -> Self {
        Self { budget }
    }
}

/// Expand the `KAB`/`KAB.` label to `KABUPATEN` and uppercase the name.
pub fn normalize_regency_name(name: &str) -> String {
    KAB_LABEL
        .replace(name.trim(), "KABUPATEN ")
        .to_uppercase()
}

impl Matcher for RegencyMatcher {
    type Output = Regency;

    fn pattern(&self) -> &Regex {
        &ROW
    }

    fn transform(&self, row: &str) -> Option<Regency> {
        let deadline = self.budget.start();
        let caps = captures_within(&ROW, row, &deadline)?;
        let name = caps.get(1)?.as_str();
        let code = strip_dots(caps.get(2)?.as_str());

        Some(Regency {
            province_code: code[..2].to_string(),
            code,
            name: normalize_regency_name(name),
        })
    }
}
