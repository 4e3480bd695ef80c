//! Error type for idnxtr.
//!
//! Provides [`ExtractError`] for fatal conditions that stop an extraction run.
//! A row that fails to match an entity grammar is *not* an error; matchers
//! report it as `None` and the transformer drops the row.

use std::fmt;

/// Fatal error types for extraction and transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// A reader method was called before a document was loaded.
    NotLoaded,
    /// The requested 1-based page does not exist in the document.
    PageNotFound {
        /// The requested page number (1-based).
        page: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// A page range expression could not be parsed.
    InvalidRange(String),
    /// A page range refers to a page outside `1..=page_count`.
    RangeExceeded {
        /// The first offending page number.
        page: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// A pipeline option failed validation.
    InvalidOption(String),
    /// The PDF structure could not be parsed.
    Parse(String),
    /// I/O error reading input or writing output.
    Io(String),
    /// Error reading or writing CSV data.
    Csv(String),
    /// Error writing JSON output.
    Json(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::NotLoaded => write!(f, "PDF not loaded"),
            ExtractError::PageNotFound { page, page_count } => {
                write!(f, "page {page} not found (document has {page_count} pages)")
            }
            ExtractError::InvalidRange(msg) => write!(f, "invalid page range: {msg}"),
            ExtractError::RangeExceeded { page, page_count } => write!(
                f,
                "page range exceeds the expected range: page {page} is outside 1-{page_count}"
            ),
            ExtractError::InvalidOption(msg) => write!(f, "{msg}"),
            ExtractError::Parse(msg) => write!(f, "parse error: {msg}"),
            ExtractError::Io(msg) => write!(f, "I/O error: {msg}"),
            ExtractError::Csv(msg) => write!(f, "CSV error: {msg}"),
            ExtractError::Json(msg) => write!(f, "JSON error: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err.to_string())
    }
}

impl From<csv::Error> for ExtractError {
    fn from(err: csv::Error) -> Self {
        ExtractError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_loaded_display() {
        assert_eq!(ExtractError::NotLoaded.to_string(), "PDF not loaded");
    }

    #[test]
    fn page_not_found_display() {
        let err = ExtractError::PageNotFound {
            page: 3,
            page_count: 2,
        };
        assert_eq!(err.to_string(), "page 3 not found (document has 2 pages)");
    }

    #[test]
    fn range_exceeded_display() {
        let err = ExtractError::RangeExceeded {
            page: 0,
            page_count: 2,
        };
        assert!(
            err.to_string()
                .contains("page range exceeds the expected range")
        );
    }

    #[test]
    fn invalid_range_display() {
        let err = ExtractError::InvalidRange("unbounded interval '1-'".to_string());
        assert_eq!(
            err.to_string(),
            "invalid page range: unbounded interval '1-'"
        );
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ExtractError::Parse("bad xref".into()));
        assert_eq!(err.to_string(), "parse error: bad xref");
    }

    #[test]
    fn clone_and_eq() {
        let err = ExtractError::InvalidOption("'output' contains forbidden character(s)".into());
        assert_eq!(err.clone(), err);
    }
}
