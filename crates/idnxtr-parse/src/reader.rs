//! Page text reader: per-page plain text with line breaks reconstructed from
//! the vertical position of text runs.

use std::path::Path;

use idnxtr_core::{ExtractError, LineOptions, assemble_lines};

use crate::lopdf_backend::{LopdfDocument, content_text_runs};
use crate::resources::PageContent;

/// Reads page text from a PDF document.
///
/// A reader starts empty; [`load`](PdfReader::load) or
/// [`load_mem`](PdfReader::load_mem) attach a document. Every page method
/// fails with [`ExtractError::NotLoaded`] before that.
#[derive(Debug, Default)]
pub struct PdfReader {
    document: Option<LopdfDocument>,
    line_options: LineOptions,
}

impl PdfReader {
    /// An empty reader with default line assembly.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty reader with custom line assembly.
    pub fn with_line_options(line_options: LineOptions) -> Self {
        Self {
            document: None,
            line_options,
        }
    }

    /// Load a document from a file, replacing any loaded one.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ExtractError> {
        let bytes = std::fs::read(path.as_ref())?;
        self.load_mem(&bytes)
    }

    /// Load a document from memory, replacing any loaded one.
    pub fn load_mem(&mut self, bytes: &[u8]) -> Result<&mut Self, ExtractError> {
        self.document = Some(LopdfDocument::open(bytes)?);
        Ok(self)
    }

    /// Whether a document is loaded.
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    fn document(&self) -> Result<&LopdfDocument, ExtractError> {
        self.document.as_ref().ok_or(ExtractError::NotLoaded)
    }

    /// Number of pages in the loaded document.
    pub fn num_pages(&self) -> Result<usize, ExtractError> {
        Ok(self.document()?.page_count())
    }

    /// Text of the 1-based page `page_number`, one visual line per
    /// `\n`-terminated line.
    pub fn page_content_string(&self, page_number: usize) -> Result<String, ExtractError> {
        let content = self.page_content(page_number)?;
        Ok(self.content_to_string(&content, page_number))
    }

    /// Content stream bytes and resolved fonts and Form XObjects of the
    /// 1-based page `page_number`.
    pub fn page_content(&self, page_number: usize) -> Result<PageContent, ExtractError> {
        let document = self.document()?;
        let page_count = document.page_count();
        if page_number == 0 || page_number > page_count {
            return Err(ExtractError::PageNotFound {
                page: page_number,
                page_count,
            });
        }
        Ok(document.page_content(page_number - 1)?)
    }

    /// Assemble page text from content obtained with
    /// [`page_content`](PdfReader::page_content).
    pub fn content_to_string(&self, content: &PageContent, page_number: usize) -> String {
        content_to_string(content, page_number, &self.line_options)
    }

    /// Line assembly settings.
    pub fn line_options(&self) -> LineOptions {
        self.line_options
    }
}

/// Page text from a page's content. Needs no document, so pages can be
/// assembled on other threads.
pub fn content_to_string(
    content: &PageContent,
    page_number: usize,
    options: &LineOptions,
) -> String {
    let runs = content_text_runs(content, page_number);
    tracing::trace!(page = page_number, runs = runs.len(), "page text runs");
    assemble_lines(&runs, options)
}
