//! CSV and JSON projection of transformed records.

use std::io::Write;

use crate::error::ExtractError;
use crate::record::Record;
use crate::transform::EntityKind;

/// A CSV writer using the output dialect: comma separated, `\n` line ends,
/// fields quoted only when needed, embedded quotes escaped with a backslash.
pub fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .double_quote(false)
        .escape(b'\\')
        .from_writer(writer)
}

/// A CSV reader for the same dialect.
pub fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .double_quote(false)
        .escape(Some(b'\\'))
        .from_reader(reader)
}

/// Write the header for `kind` followed by one line per record.
pub fn write_csv<W: Write>(
    kind: EntityKind,
    records: &[Record],
    writer: W,
) -> Result<(), ExtractError> {
    let mut csv = csv_writer(writer);
    csv.write_record(kind.header())?;
    for record in records {
        csv.write_record(record.csv_row())?;
    }
    csv.flush()?;
    Ok(())
}

/// Render records as a CSV string. An empty record set yields the header
/// line only.
pub fn to_csv_string(kind: EntityKind, records: &[Record]) -> Result<String, ExtractError> {
    let mut buf = Vec::new();
    write_csv(kind, records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExtractError::Csv(e.to_string()))
}

/// Render records as a pretty-printed JSON array of objects keyed by the CSV
/// column names.
pub fn to_json_string(records: &[Record]) -> Result<String, ExtractError> {
    Ok(serde_json::to_string_pretty(records)?)
}
