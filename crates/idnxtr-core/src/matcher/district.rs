use std::sync::LazyLock;

use regex::Regex;

use super::{MatchBudget, Matcher, NameBoundary, captures_within};
use crate::divider::{DividerWordList, DividerWordOptions};
use crate::record::{District, strip_dots};

static CODE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2}\.[0-9]{2}\.[0-9]{2})\s").expect("district code pattern")
});

/// Matches `NN.NN.NN <name> [counts] [remarks]` rows.
///
/// The name is the shortest text after the code that is followed by optional
/// numeric columns and then either the end of the row or a divider word.
/// `desa` and `nagari` are not dividers here: they occur inside district
/// names.
#[derive(Debug, Clone)]
pub struct DistrictMatcher {
    boundary: NameBoundary,
    budget: MatchBudget,
}

impl DistrictMatcher {
    /// Words that are allowed inside district names.
    pub const NAME_WORDS: [&'static str; 2] = ["desa", "nagari"];

    pub fn new(dividers: &DividerWordList, budget: MatchBudget) -> Self {
        let options = DividerWordOptions::with_typos().excluding(&Self::NAME_WORDS);
        Self {
            boundary: NameBoundary::new(&dividers.words(&options)),
            budget,
        }
    }
}

impl Default for DistrictMatcher {
    fn default() -> Self {
        Self::new(DividerWordList::builtin(), MatchBudget::default())
    }
}

fn is_count_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ' '
}

/// Where the name ends if the row's name part ends at `boundary`: counts
/// (digits, dots, spaces) and one optional whitespace before them are not
/// part of the name. The name keeps at least one character.
fn name_end(text: &str, boundary: usize) -> usize {
    let head = &text[..boundary];
    let mut start = head
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_count_char(c))
        .last()
        .map_or(boundary, |(i, _)| i);

    if let Some(prev) = head[..start].chars().next_back() {
        if prev.is_whitespace() {
            start -= prev.len_utf8();
        }
    }

    let first_len = text.chars().next().map_or(0, char::len_utf8);
    start.max(first_len)
}

impl Matcher for DistrictMatcher {
    type Output = District;

    fn pattern(&self) -> &Regex {
        &CODE_PREFIX
    }

    fn transform(&self, row: &str) -> Option<District> {
        let deadline = self.budget.start();
        let caps = captures_within(&CODE_PREFIX, row, &deadline)?;
        let code_match = caps.get(1)?;
        let rest = &row[caps.get(0)?.end()..];

        let end = self
            .boundary
            .positions(rest, &deadline)?
            .into_iter()
            .map(|boundary| name_end(rest, boundary))
            .min()?;

        let name = rest[..end].trim();
        if name.is_empty() {
            return None;
        }

        let code = strip_dots(code_match.as_str());
        Some(District {
            regency_code: code[..4].to_string(),
            code,
            name: name.to_uppercase(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn district(code: &str, regency_code: &str, name: &str) -> District {
        District {
            code: code.into(),
            regency_code: regency_code.into(),
            name: name.into(),
        }
    }

    #[test]
    fn name_stops_before_counts_and_remarks() {
        let row = "11.01.04 Labuhanhaji 23 16 Perubahan nama Kec Labuhan Haji, sesuai Surat Gub. No. 140/5443 tgl";
        assert_eq!(
            DistrictMatcher::default().transform(row),
            Some(district("110104", "1101", "LABUHANHAJI"))
        );
    }

    #[test]
    fn name_runs_to_end_of_row() {
        assert_eq!(
            DistrictMatcher::default().transform("11.01.02 Kluet Utara"),
            Some(district("110102", "1101", "KLUET UTARA"))
        );
    }

    #[test]
    fn trailing_counts_are_dropped() {
        assert_eq!(
            DistrictMatcher::default().transform("11.01.01 Bakongan 7 7 1.234"),
            Some(district("110101", "1101", "BAKONGAN"))
        );
    }

    #[test]
    fn desa_and_nagari_stay_in_the_name() {
        assert_eq!(
            DistrictMatcher::default().transform("13.06.12 Nagari Desa Baru 12"),
            Some(district("130612", "1306", "NAGARI DESA BARU"))
        );
    }

    #[test]
    fn earliest_divider_wins() {
        let row = "11.01.03 Kluet Selatan 11 Pemekaran Perda 2005 sesuai UU";
        assert_eq!(
            DistrictMatcher::default().transform(row),
            Some(district("110103", "1101", "KLUET SELATAN"))
        );
    }

    #[test]
    fn name_keeps_at_least_one_character() {
        assert_eq!(
            DistrictMatcher::default().transform("11.01.05 7 Pemekaran"),
            Some(district("110105", "1101", "7"))
        );
    }

    #[test]
    fn non_matching_rows() {
        let matcher = DistrictMatcher::default();
        assert_eq!(matcher.transform("lorem ipsum"), None);
        assert_eq!(matcher.transform("11.01 Aceh Selatan"), None);
        assert_eq!(matcher.transform("11.01.04"), None);
        assert_eq!(matcher.transform(""), None);
    }

    #[test]
    fn adversarial_row_is_bounded() {
        let row = format!("00.00.00\nh{}\n", "0\tqanun b".repeat(18258));
        let started = std::time::Instant::now();
        let _ = DistrictMatcher::default().transform(&row);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn name_end_helper() {
        assert_eq!(name_end("Foo 12 3", 8), 3);
        assert_eq!(name_end("Foo\t12", 6), 3);
        assert_eq!(name_end("12", 2), 1);
        assert_eq!(name_end("Foo", 3), 3);
    }
}
