//! Row mergers: reassemble one logical record from rows that the PDF layout
//! wrapped over several lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::divider::DividerPrefix;

static REGENCY_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:KAB\.?|KOTA)\s[A-Z. ]+)\s").expect("regency opener pattern")
});

static NAME_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z.'()/\- ]+$").expect("name fragment pattern"));

/// Append `row` to the last merged row, space separated. Returns `false` when
/// there is nothing to append to.
fn append_to_last(merged: &mut [String], row: &str) -> bool {
    match merged.last_mut() {
        Some(last) => {
            last.push(' ');
            last.push_str(row);
            true
        }
        None => false,
    }
}

/// Merge regency rows: every row that starts with a `KAB`/`KOTA` label opens a
/// record, all other rows continue the last opened one. Rows before the first
/// label are dropped.
pub fn merge_regency_rows<S: AsRef<str>>(rows: &[S]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();

    for row in rows {
        let row = row.as_ref();
        if REGENCY_OPENER.is_match(row) {
            merged.push(row.to_string());
        } else if !append_to_last(&mut merged, row) {
            tracing::trace!(row, "regency continuation without an opener, dropped");
        }
    }

    merged
}

/// Joins wrapped village names back onto their row.
#[derive(Debug, Clone)]
pub struct VillageRowMerger {
    divider: DividerPrefix,
    column_width: usize,
}

impl VillageRowMerger {
    /// Width of the name column in the published tables.
    pub const DEFAULT_COLUMN_WIDTH: usize = 26;

    pub fn new(divider_words: &[String], column_width: usize) -> Self {
        Self {
            divider: DividerPrefix::new(divider_words),
            column_width,
        }
    }

    /// Whether `row` looks like the wrapped rest of a village name: letters
    /// and name punctuation only, not starting with a divider word, and no
    /// wider than the name column.
    pub fn is_fragment(&self, row: &str) -> bool {
        NAME_FRAGMENT.is_match(row)
            && !self.divider.is_match(row)
            && row.chars().count() <= self.column_width
    }

    /// Merge fragments onto the previous row. A fragment with no previous
    /// row is dropped.
    pub fn merge<S: AsRef<str>>(&self, rows: &[S]) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();

        for row in rows {
            let row = row.as_ref();
            if !self.is_fragment(row) {
                merged.push(row.to_string());
            } else if !append_to_last(&mut merged, row) {
                tracing::trace!(row, "village name fragment without a row, dropped");
            }
        }

        merged
    }
}
