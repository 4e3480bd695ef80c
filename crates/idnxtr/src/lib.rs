//! idnxtr: extract Indonesian administrative-area records from PDF
//! gazetteers.
//!
//! This is the public API facade. It re-exports the records and algorithms of
//! `idnxtr-core`, reads PDFs through `idnxtr-parse`, and ties both together
//! in the [`Extractor`] pipeline.
//!
//! # Architecture
//!
//! - **idnxtr-core**: records, matchers, mergers, transformer, CSV/JSON
//! - **idnxtr-parse**: PDF loading and page text reconstruction
//! - **idnxtr** (this crate): extraction helpers and the end-to-end pipeline
//!
//! # Example
//!
//! ```no_run
//! use idnxtr::{EntityKind, Extractor, ExtractorOptions};
//!
//! let mut options = ExtractorOptions::new(EntityKind::Districts, "permendagri.pdf");
//! options.range = Some("3-10".to_string());
//! let summary = Extractor::new(options)?.run()?;
//! println!("{} records written to {}", summary.records, summary.output_path.display());
//! # Ok::<(), idnxtr::ExtractError>(())
//! ```

mod extract;
mod pipeline;

pub use idnxtr_core;
pub use idnxtr_parse;

pub use idnxtr_core::{
    Comparison, DiffSummary, District, EntityKind, ExtractError, Island, PageRange, Record,
    Regency, RowOptions, TransformOptions, Transformer, Village, compare_csv, extract_rows,
    resolve_page_range, to_csv_string, to_json_string, transform_many, write_csv,
};
pub use idnxtr_parse::PdfReader;

pub use extract::{
    PdfExtractResult, extract_from_pdf, extract_from_pdf_bytes, extract_txt_file_rows,
};
pub use pipeline::{
    ExtractedRows, ExtractionSummary, Extractor, ExtractorOptions, InputKind, OutputFormat,
    Progress,
};
