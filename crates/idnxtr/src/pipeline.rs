//! End-to-end extraction: validate options, read rows, transform, write.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use idnxtr_core::{
    DiffSummary, EntityKind, ExtractError, Record, RowOptions, TransformOptions, Transformer,
    compare_csv, extract_rows, to_csv_string, to_json_string,
};
use regex::Regex;

use crate::extract::extract_from_pdf;

static OUTPUT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\- ]+$").expect("output name pattern"));

static RANGE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]-?,?)+\b$").expect("range shape pattern"));

/// Format of the transformed dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }

    /// Render `records` of `kind` in this format.
    pub fn render(self, kind: EntityKind, records: &[Record]) -> Result<String, ExtractError> {
        match self {
            OutputFormat::Csv => to_csv_string(kind, records),
            OutputFormat::Json => to_json_string(records),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ExtractError::InvalidOption(format!(
                "'format' must be one of csv, json (got '{s}')"
            ))),
        }
    }
}

/// The kind of input file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Text,
}

impl InputKind {
    /// `.pdf` or `.txt`, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(InputKind::Pdf)
        } else if ext.eq_ignore_ascii_case("txt") {
            Some(InputKind::Text)
        } else {
            None
        }
    }
}

/// Options for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// The kind of area to extract.
    pub entity: EntityKind,
    /// A `.pdf` document or a `.txt` file with one row per line.
    pub file_path: PathBuf,
    /// Output directory. `None` means the current directory.
    pub destination: Option<PathBuf>,
    /// Output file base name (no extension). Defaults to the entity tag.
    pub output: Option<String>,
    /// Page range expression such as `1-2,5,7-10`. Ignored for text input.
    pub range: Option<String>,
    /// Also write the extracted page text to `raw-<name>.txt`.
    pub save_raw: bool,
    /// A previously published CSV to compare the result with.
    pub compare_with: Option<PathBuf>,
    pub format: OutputFormat,
    pub transform: TransformOptions,
}

impl ExtractorOptions {
    pub fn new(entity: EntityKind, file_path: impl Into<PathBuf>) -> Self {
        Self {
            entity,
            file_path: file_path.into(),
            destination: None,
            output: None,
            range: None,
            save_raw: false,
            compare_with: None,
            format: OutputFormat::default(),
            transform: TransformOptions::default(),
        }
    }

    /// Check every option without touching the input's content.
    pub fn validate(&self) -> Result<InputKind, ExtractError> {
        if is_blank(&self.file_path) {
            return Err(invalid("'file_path' is required"));
        }
        let input = InputKind::from_path(&self.file_path)
            .filter(|_| self.file_path.is_file())
            .ok_or_else(|| invalid("'file_path' must be a PDF or text file path"))?;

        if let Some(destination) = &self.destination {
            if is_blank(destination) {
                return Err(invalid("'destination' must not be empty"));
            }
            if !destination.is_dir() {
                return Err(invalid("'destination' must be a directory path"));
            }
        }

        if let Some(output) = &self.output {
            if output.trim().is_empty() {
                return Err(invalid("'output' must not be empty"));
            }
            if !OUTPUT_NAME.is_match(output) {
                return Err(invalid("'output' contains forbidden character(s)"));
            }
        }

        if let Some(range) = &self.range {
            if !RANGE_SHAPE.is_match(range) {
                return Err(invalid("'range' format is invalid"));
            }
        }

        if let Some(previous) = &self.compare_with {
            if !previous.is_file() {
                return Err(invalid("'compare_with' must be a file path"));
            }
        }

        Ok(input)
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

fn invalid(msg: &str) -> ExtractError {
    ExtractError::InvalidOption(msg.to_string())
}

/// Rows read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRows {
    /// Page count of the PDF; `None` for text input.
    pub num_pages: Option<usize>,
    /// Pages read from the PDF; `None` for text input.
    pub pages_extracted: Option<usize>,
    /// The text the rows were split from.
    pub raw: String,
    /// Trimmed, non-empty rows.
    pub rows: Vec<String>,
}

/// A step finished during [`Extractor::run_with_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Rows were read; page counts are `None` for text input.
    RowsExtracted {
        pages_extracted: Option<usize>,
        num_pages: Option<usize>,
        rows: usize,
    },
    /// Rows were transformed into this many records.
    Transformed { records: usize },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::RowsExtracted {
                pages_extracted: Some(extracted),
                num_pages: Some(total),
                rows,
            } => write!(f, "{extracted}/{total} pages extracted ({rows} rows)"),
            Progress::RowsExtracted { rows, .. } => write!(f, "{rows} rows extracted"),
            Progress::Transformed { records } => write!(f, "{records} data transformed"),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub num_pages: Option<usize>,
    pub pages_extracted: Option<usize>,
    /// Number of rows read from the input.
    pub rows: usize,
    /// Number of records written.
    pub records: usize,
    pub output_path: PathBuf,
    pub raw_path: Option<PathBuf>,
    pub diff_path: Option<PathBuf>,
    pub diff: Option<DiffSummary>,
}

/// A validated extraction run.
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractorOptions,
    input: InputKind,
    transformer: Transformer,
}

impl Extractor {
    /// Validate `options` and prepare the transformer.
    pub fn new(options: ExtractorOptions) -> Result<Self, ExtractError> {
        let input = options.validate()?;
        let transformer = Transformer::new(options.entity, &options.transform);
        Ok(Self {
            options,
            input,
            transformer,
        })
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    pub fn input_kind(&self) -> InputKind {
        self.input
    }

    /// Output base name: `output` if given, the entity tag otherwise.
    pub fn base_name(&self) -> &str {
        self.options
            .output
            .as_deref()
            .unwrap_or(self.options.entity.as_str())
    }

    fn destination_file(&self, file_name: String) -> PathBuf {
        match &self.options.destination {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Read the input and split it into rows.
    pub fn extract_rows(&self) -> Result<ExtractedRows, ExtractError> {
        match self.input {
            InputKind::Pdf => {
                let result = extract_from_pdf(&self.options.file_path, self.options.range.as_deref())?;
                let raw = result.text();
                Ok(ExtractedRows {
                    num_pages: Some(result.num_pages),
                    pages_extracted: Some(result.pages_extracted),
                    rows: extract_rows(&raw, RowOptions::clean()),
                    raw,
                })
            }
            InputKind::Text => {
                if let Some(range) = &self.options.range {
                    tracing::debug!(range = %range, "page range ignored for text input");
                }
                let raw = std::fs::read_to_string(&self.options.file_path)?;
                Ok(ExtractedRows {
                    num_pages: None,
                    pages_extracted: None,
                    rows: extract_rows(&raw, RowOptions::clean()),
                    raw,
                })
            }
        }
    }

    /// Write the raw page text when `save_raw` is set and the input is a PDF.
    pub fn save_raw(&self, extracted: &ExtractedRows) -> Result<Option<PathBuf>, ExtractError> {
        if !self.options.save_raw || self.input != InputKind::Pdf {
            return Ok(None);
        }
        let path = self.destination_file(format!("raw-{}.txt", self.base_name()));
        std::fs::write(&path, &extracted.raw)?;
        tracing::debug!(path = %path.display(), "raw text saved");
        Ok(Some(path))
    }

    /// Transform rows into sorted records.
    pub fn transform(&self, rows: &[String]) -> Vec<Record> {
        self.transformer.transform_many(rows)
    }

    /// Write the dataset in the configured format.
    pub fn write_output(&self, records: &[Record]) -> Result<PathBuf, ExtractError> {
        let format = self.options.format;
        let path = self.destination_file(format!("{}.{}", self.base_name(), format.extension()));
        std::fs::write(&path, format.render(self.options.entity, records)?)?;
        Ok(path)
    }

    /// Compare with `compare_with` and write `<name>.diff`. The comparison
    /// is always made on the CSV projection.
    pub fn compare(
        &self,
        records: &[Record],
    ) -> Result<Option<(PathBuf, DiffSummary)>, ExtractError> {
        let Some(previous_path) = &self.options.compare_with else {
            return Ok(None);
        };
        let previous = std::fs::read_to_string(previous_path)?;
        let current = to_csv_string(self.options.entity, records)?;
        let comparison = compare_csv(&previous, &current)?;

        let path = self.destination_file(format!("{}.diff", self.base_name()));
        std::fs::write(&path, &comparison.report)?;
        tracing::debug!(
            path = %path.display(),
            added = comparison.summary.added,
            removed = comparison.summary.removed,
            changed = comparison.summary.changed,
            "comparison written"
        );
        Ok(Some((path, comparison.summary)))
    }

    /// Run every step.
    pub fn run(&self) -> Result<ExtractionSummary, ExtractError> {
        self.run_with_progress(|_| {})
    }

    /// Run every step, reporting each finished one to `on_progress`.
    pub fn run_with_progress(
        &self,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<ExtractionSummary, ExtractError> {
        let extracted = self.extract_rows()?;
        let raw_path = self.save_raw(&extracted)?;
        on_progress(Progress::RowsExtracted {
            pages_extracted: extracted.pages_extracted,
            num_pages: extracted.num_pages,
            rows: extracted.rows.len(),
        });

        let records = self.transform(&extracted.rows);
        let output_path = self.write_output(&records)?;
        on_progress(Progress::Transformed {
            records: records.len(),
        });

        let (diff_path, diff) = match self.compare(&records)? {
            Some((path, summary)) => (Some(path), Some(summary)),
            None => (None, None),
        };

        tracing::info!(
            entity = %self.options.entity,
            rows = extracted.rows.len(),
            records = records.len(),
            output = %output_path.display(),
            "extraction finished"
        );

        Ok(ExtractionSummary {
            num_pages: extracted.num_pages,
            pages_extracted: extracted.pages_extracted,
            rows: extracted.rows.len(),
            records: records.len(),
            output_path,
            raw_path,
            diff_path,
            diff,
        })
    }
}
