//! Row extraction from PDF and text inputs.

use std::path::Path;

use idnxtr_core::{ExtractError, PageRange, RowOptions, extract_rows, resolve_page_range};
use idnxtr_parse::PdfReader;

/// Text extracted from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExtractResult {
    /// Total number of pages in the document.
    pub num_pages: usize,
    /// Number of pages extracted.
    pub pages_extracted: usize,
    /// Canonical form of the extracted range (`1-3,5`).
    pub page_range: String,
    /// Page texts in ascending page order.
    pub page_contents: Vec<String>,
}

impl PdfExtractResult {
    /// All page texts joined by `\n`.
    pub fn text(&self) -> String {
        self.page_contents.join("\n")
    }

    /// Trimmed, non-empty rows of all extracted pages.
    pub fn rows(&self) -> Vec<String> {
        extract_rows(&self.text(), RowOptions::clean())
    }
}

/// Extract page texts from a PDF file.
///
/// `range` is a page range expression (`1-2,5,7-10`); `None` extracts every
/// page. The expression is parsed before it is checked against the page
/// count, so a malformed range is always [`ExtractError::InvalidRange`].
pub fn extract_from_pdf(
    path: impl AsRef<Path>,
    range: Option<&str>,
) -> Result<PdfExtractResult, ExtractError> {
    let bytes = std::fs::read(path.as_ref())?;
    extract_from_pdf_bytes(&bytes, range)
}

/// Extract page texts from PDF bytes. See [`extract_from_pdf`].
pub fn extract_from_pdf_bytes(
    bytes: &[u8],
    range: Option<&str>,
) -> Result<PdfExtractResult, ExtractError> {
    let mut reader = PdfReader::new();
    reader.load_mem(bytes)?;
    let num_pages = reader.num_pages()?;
    let page_range = resolve_page_range(range, num_pages)?;

    let page_contents = read_pages(&reader, &page_range)?;
    tracing::debug!(
        num_pages,
        pages_extracted = page_contents.len(),
        range = %page_range,
        "PDF pages extracted"
    );

    Ok(PdfExtractResult {
        num_pages,
        pages_extracted: page_range.len(),
        page_range: page_range.to_string(),
        page_contents,
    })
}

#[cfg(not(feature = "parallel"))]
fn read_pages(reader: &PdfReader, range: &PageRange) -> Result<Vec<String>, ExtractError> {
    range
        .pages()
        .into_iter()
        .map(|page| reader.page_content_string(page))
        .collect()
}

/// Page content and resources are read in order; text assembly runs
/// concurrently and is collected back in page order.
#[cfg(feature = "parallel")]
fn read_pages(reader: &PdfReader, range: &PageRange) -> Result<Vec<String>, ExtractError> {
    use rayon::prelude::*;

    let contents = range
        .pages()
        .into_iter()
        .map(|page| Ok((page, reader.page_content(page)?)))
        .collect::<Result<Vec<_>, ExtractError>>()?;

    let line_options = reader.line_options();
    Ok(contents
        .par_iter()
        .map(|(page, content)| idnxtr_parse::content_to_string(content, *page, &line_options))
        .collect())
}

/// Rows of a UTF-8 text file.
pub fn extract_txt_file_rows(
    path: impl AsRef<Path>,
    options: RowOptions,
) -> Result<Vec<String>, ExtractError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(extract_rows(&text, options))
}
