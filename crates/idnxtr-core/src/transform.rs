//! Transformer orchestrator: merge wrapped rows, match every row against the
//! entity grammar, drop non-matches and sort the records by code.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::divider::{DividerWordList, DividerWordOptions};
use crate::error::ExtractError;
use crate::matcher::{
    DistrictMatcher, IslandMatcher, MatchBudget, Matcher, RegencyMatcher, VillageMatcher,
};
use crate::merge::{VillageRowMerger, merge_regency_rows};
use crate::record::{CsvRecord, District, Island, Record, Regency, Village};

/// The kind of administrative area being extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Regencies,
    Districts,
    Islands,
    Villages,
}

impl EntityKind {
    /// Every kind, in hierarchy order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Regencies,
        EntityKind::Districts,
        EntityKind::Islands,
        EntityKind::Villages,
    ];

    /// The lowercase tag (`regencies`, `districts`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Regencies => "regencies",
            EntityKind::Districts => "districts",
            EntityKind::Islands => "islands",
            EntityKind::Villages => "villages",
        }
    }

    /// CSV column headers for this kind.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            EntityKind::Regencies => Regency::HEADER,
            EntityKind::Districts => District::HEADER,
            EntityKind::Islands => Island::HEADER,
            EntityKind::Villages => Village::HEADER,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ExtractError::InvalidOption(format!(
                    "unknown data type '{s}', expected one of: regencies, districts, islands, villages"
                ))
            })
    }
}

/// Options for [`Transformer`].
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Time allowed for matching one row (default 500ms).
    pub match_timeout: Duration,
    /// Width of the village name column; wrapped fragments up to this many
    /// characters are joined back onto their row (default 26).
    pub village_column_width: usize,
    /// Replacement divider word table. `None` uses the built-in table.
    pub divider_words: Option<DividerWordList>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            match_timeout: MatchBudget::DEFAULT_TIMEOUT,
            village_column_width: VillageRowMerger::DEFAULT_COLUMN_WIDTH,
            divider_words: None,
        }
    }
}

/// A matcher and merger pair for one entity kind, built once per run.
#[derive(Debug, Clone)]
pub enum Transformer {
    Regencies(RegencyMatcher),
    Districts(DistrictMatcher),
    Islands(IslandMatcher),
    Villages {
        matcher: VillageMatcher,
        merger: VillageRowMerger,
    },
}

impl Transformer {
    /// Build the transformer for `kind`.
    pub fn new(kind: EntityKind, options: &TransformOptions) -> Self {
        let budget = MatchBudget::new(options.match_timeout);
        let dividers = match &options.divider_words {
            Some(list) => list,
            None => DividerWordList::builtin(),
        };

        match kind {
            EntityKind::Regencies => Transformer::Regencies(RegencyMatcher::new(budget)),
            EntityKind::Districts => {
                Transformer::Districts(DistrictMatcher::new(dividers, budget))
            }
            EntityKind::Islands => Transformer::Islands(IslandMatcher::new(budget)),
            EntityKind::Villages => Transformer::Villages {
                matcher: VillageMatcher::new(dividers, budget),
                merger: VillageRowMerger::new(
                    &dividers.words(&DividerWordOptions::with_typos()),
                    options.village_column_width,
                ),
            },
        }
    }

    /// The entity kind this transformer produces.
    pub fn kind(&self) -> EntityKind {
        match self {
            Transformer::Regencies(_) => EntityKind::Regencies,
            Transformer::Districts(_) => EntityKind::Districts,
            Transformer::Islands(_) => EntityKind::Islands,
            Transformer::Villages { .. } => EntityKind::Villages,
        }
    }

    /// Reassemble records that wrapped over several rows.
    pub fn prepare<S: AsRef<str>>(&self, rows: &[S]) -> Vec<String> {
        match self {
            Transformer::Regencies(_) => merge_regency_rows(rows),
            Transformer::Villages { merger, .. } => merger.merge(rows),
            Transformer::Districts(_) | Transformer::Islands(_) => {
                rows.iter().map(|row| row.as_ref().to_string()).collect()
            }
        }
    }

    /// Match a single (already merged) row.
    pub fn transform(&self, row: &str) -> Option<Record> {
        match self {
            Transformer::Regencies(m) => m.transform(row).map(Record::from),
            Transformer::Districts(m) => m.transform(row).map(Record::from),
            Transformer::Islands(m) => m.transform(row).map(Record::from),
            Transformer::Villages { matcher, .. } => matcher.transform(row).map(Record::from),
        }
    }

    /// Merge, match and sort. Rows that do not match are dropped; records
    /// with equal codes keep their source order.
    pub fn transform_many<S: AsRef<str>>(&self, rows: &[S]) -> Vec<Record> {
        let prepared = self.prepare(rows);
        let mut records: Vec<Record> = prepared
            .iter()
            .filter_map(|row| self.transform(row))
            .collect();
        records.sort_by(|a, b| a.code().cmp(b.code()));

        tracing::debug!(
            kind = %self.kind(),
            rows = rows.len(),
            merged = prepared.len(),
            records = records.len(),
            "rows transformed"
        );
        records
    }
}

/// Transform `rows` into records of `kind` with default options.
pub fn transform_many<S: AsRef<str>>(kind: EntityKind, rows: &[S]) -> Vec<Record> {
    Transformer::new(kind, &TransformOptions::default()).transform_many(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string().parse::<EntityKind>(), Ok(kind));
        }
        assert!("provinces".parse::<EntityKind>().is_err());
    }

    #[test]
    fn headers_per_kind() {
        assert_eq!(
            EntityKind::Regencies.header(),
            &["code", "province_code", "name"]
        );
        assert_eq!(EntityKind::Islands.header().len(), 6);
        assert_eq!(EntityKind::Villages.header()[1], "district_code");
    }

    #[test]
    fn non_matching_rows_give_nothing() {
        for kind in EntityKind::ALL {
            assert!(transform_many(kind, &["lorem ipsum", "dolor sit amet"]).is_empty());
        }
    }

    #[test]
    fn records_are_sorted_stably_by_code() {
        let rows = [
            "11.01.03 Kluet Selatan",
            "11.01.01 Bakongan",
            "11.01.03 Kluet Selatan Baru",
        ];
        let names: Vec<_> = transform_many(EntityKind::Districts, &rows)
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, ["BAKONGAN", "KLUET SELATAN", "KLUET SELATAN BARU"]);
    }

    #[test]
    fn custom_divider_table() {
        let options = TransformOptions {
            divider_words: Some(DividerWordList::parse("hapus\n")),
            ..TransformOptions::default()
        };
        let transformer = Transformer::new(EntityKind::Villages, &options);
        let records = transformer.transform_many(&["11.01.01.2001 Keude Hapus lama"]);
        assert_eq!(records[0].name(), "KEUDE");
    }

    #[test]
    fn borrowed_and_builtin_tables_both_build() {
        let custom = TransformOptions {
            divider_words: Some(DividerWordList::parse("hapus\n")),
            ..TransformOptions::default()
        };
        for kind in EntityKind::ALL {
            let with_custom = Transformer::new(kind, &custom);
            let with_builtin = Transformer::new(kind, &TransformOptions::default());
            assert!(with_custom.transform_many(&["lorem"]).is_empty());
            assert!(with_builtin.transform_many(&["lorem"]).is_empty());
        }
        let records = Transformer::new(EntityKind::Districts, &TransformOptions::default())
            .transform_many(&["11.01.01 Bakongan 7 7 1.234"]);
        assert_eq!(records[0].name(), "BAKONGAN");
    }

    #[test]
    fn village_rows_are_merged_before_matching() {
        let rows = ["13.07.04.2001 1 Tj. Haro Sikabu-kabu", "Pd. Panjang"];
        let records = transform_many(EntityKind::Villages, &rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "TJ. HARO SIKABU-KABU PD. PANJANG");
    }
}
