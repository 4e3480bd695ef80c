//! Error types for the PDF backend.
//!
//! Uses [`thiserror`] for derivation. [`BackendError`] wraps lopdf and
//! content stream failures and converts into [`ExtractError`].

use idnxtr_core::ExtractError;
use thiserror::Error;

/// Error type for PDF backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed page content stream.
    #[error("content stream error: {0}")]
    Content(String),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for ExtractError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => ExtractError::Parse(msg),
            BackendError::Io(e) => ExtractError::Io(e.to_string()),
            BackendError::Content(msg) => ExtractError::Parse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn content_becomes_parse_error() {
        let err: ExtractError = BackendError::Content("unterminated array".to_string()).into();
        assert_eq!(err, ExtractError::Parse("unterminated array".to_string()));
    }

    #[test]
    fn io_becomes_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExtractError = BackendError::Io(io_err).into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
