//! Comparison of a freshly extracted dataset with a previously published
//! one.

use std::collections::BTreeMap;

use crate::csv_export::{csv_reader, csv_writer};
use crate::error::ExtractError;

/// Counts of codes that differ between two datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffSummary {
    /// Whether the datasets are identical.
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.changed == 0
    }
}

/// A rendered comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Unified-diff style report.
    pub report: String,
    pub summary: DiffSummary,
}

type RowsByCode = BTreeMap<String, Vec<String>>;

fn render_row(fields: &csv::StringRecord) -> Result<String, ExtractError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv_writer(&mut buf);
        writer.write_record(fields)?;
        writer.flush()?;
    }
    let line = String::from_utf8(buf).map_err(|e| ExtractError::Csv(e.to_string()))?;
    Ok(line.trim_end_matches('\n').to_string())
}

fn rows_by_code(label: &str, text: &str) -> Result<(csv::StringRecord, RowsByCode), ExtractError> {
    let mut reader = csv_reader(text.as_bytes());
    let header = reader.headers()?.clone();
    let code_index = header
        .iter()
        .position(|h| h == "code")
        .ok_or_else(|| ExtractError::Csv(format!("{label} dataset has no 'code' column")))?;

    let mut rows = RowsByCode::new();
    for record in reader.records() {
        let record = record?;
        let code = record.get(code_index).unwrap_or_default().to_string();
        rows.entry(code).or_default().push(render_row(&record)?);
    }
    Ok((header, rows))
}

/// Compare two CSV datasets of the same entity kind by `code`.
///
/// The report starts with `--- previous` / `+++ current`, then lists in code
/// order `-row` for removed codes, `+row` for added codes and `-old`/`+new`
/// pairs for changed codes. Rows sharing a code are compared as a group.
pub fn compare_csv(previous: &str, current: &str) -> Result<Comparison, ExtractError> {
    let (previous_header, previous_rows) = rows_by_code("previous", previous)?;
    let (current_header, current_rows) = rows_by_code("current", current)?;
    if previous_header != current_header {
        return Err(ExtractError::Csv(format!(
            "column mismatch: previous has [{}], current has [{}]",
            previous_header.iter().collect::<Vec<_>>().join(","),
            current_header.iter().collect::<Vec<_>>().join(","),
        )));
    }

    let mut codes: Vec<&String> = previous_rows.keys().chain(current_rows.keys()).collect();
    codes.sort();
    codes.dedup();

    let mut report = String::from("--- previous\n+++ current\n");
    let mut summary = DiffSummary::default();
    let empty = Vec::new();

    for code in codes {
        let old = previous_rows.get(code).unwrap_or(&empty);
        let new = current_rows.get(code).unwrap_or(&empty);
        if old == new {
            continue;
        }

        match (old.is_empty(), new.is_empty()) {
            (false, true) => summary.removed += 1,
            (true, false) => summary.added += 1,
            _ => summary.changed += 1,
        }
        for row in old {
            report.push('-');
            report.push_str(row);
            report.push('\n');
        }
        for row in new {
            report.push('+');
            report.push_str(row);
            report.push('\n');
        }
    }

    tracing::debug!(
        added = summary.added,
        removed = summary.removed,
        changed = summary.changed,
        "datasets compared"
    );
    Ok(Comparison { report, summary })
}
