//! idnxtr-core: backend-independent records and algorithms.
//!
//! This crate turns extracted page text into administrative-area records
//! (regencies, districts, islands, villages): row splitting, line assembly
//! from positioned text runs, page ranges, divider words, the per-entity
//! matchers and row mergers, the transformer, and the CSV/JSON projection.
//! PDF access lives in `idnxtr-parse`.

pub mod compare;
pub mod coordinate;
pub mod csv_export;
pub mod divider;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod page_range;
pub mod record;
pub mod rows;
pub mod text;
pub mod transform;

pub use compare::{Comparison, DiffSummary, compare_csv};
pub use coordinate::{Compass, Coordinate, Dms};
pub use csv_export::{to_csv_string, to_json_string, write_csv};
pub use divider::{DividerWordList, DividerWordOptions, divider_words};
pub use error::ExtractError;
pub use matcher::{
    DistrictMatcher, IslandMatcher, MatchBudget, Matcher, RegencyMatcher, VillageMatcher,
};
pub use merge::{VillageRowMerger, merge_regency_rows};
pub use page_range::{PageRange, resolve_page_range};
pub use record::{CsvRecord, District, Island, Record, Regency, Village};
pub use rows::{RowOptions, extract_rows};
pub use text::{LineOptions, TextRun, assemble_lines};
pub use transform::{EntityKind, TransformOptions, Transformer, transform_many};
