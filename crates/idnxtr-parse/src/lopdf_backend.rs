//! lopdf-based document access.
//!
//! Opens documents with [lopdf](https://crates.io/crates/lopdf), caches the
//! page object ids in page order and hands out each page's decoded content
//! stream bytes with its resolved fonts and Form XObjects.

use idnxtr_core::TextRun;

use crate::content::text_runs;
use crate::error::BackendError;
use crate::resources::PageContent;
use crate::tokenizer::tokenize;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids indexed by 0-based page number.
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    /// Parse a document from memory. Encrypted documents are rejected.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Parse(
                "encrypted documents are not supported".to_string(),
            ));
        }

        // get_pages is keyed by 1-based page number.
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();
        tracing::debug!(pages = page_ids.len(), "PDF opened");

        Ok(Self { inner, page_ids })
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_id(&self, index: usize) -> Result<lopdf::ObjectId, BackendError> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                self.page_ids.len()
            ))
        })
    }

    /// Content of the page at 0-based `index`. A page without content
    /// yields an empty buffer.
    pub fn page_content(&self, index: usize) -> Result<PageContent, BackendError> {
        let page_id = self.page_id(index)?;
        let page = self.inner.get_dictionary(page_id)?;
        let content = content_stream_bytes(&self.inner, page);
        Ok(PageContent::load(&self.inner, page, content))
    }

    /// Text runs of the page at 0-based `index`, in content stream order.
    ///
    /// A content stream that cannot be tokenized is skipped with a warning;
    /// the page then has no text.
    pub fn page_text_runs(&self, index: usize) -> Result<Vec<TextRun>, BackendError> {
        let content = self.page_content(index)?;
        Ok(content_text_runs(&content, index + 1))
    }
}

/// Text runs of a page's content. Content that cannot be tokenized is
/// skipped with a warning naming the 1-based `page_number`.
pub fn content_text_runs(page: &PageContent, page_number: usize) -> Vec<TextRun> {
    match tokenize(&page.content) {
        Ok(operations) => text_runs(&operations, page),
        Err(e) => {
            tracing::warn!(page = page_number, "content stream skipped: {e}");
            Vec::new()
        }
    }
}

pub(crate) fn resolve<'a>(
    doc: &'a lopdf::Document,
    obj: &'a lopdf::Object,
) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Decompressed stream content, falling back to the raw bytes for filters
/// lopdf cannot decode.
pub(crate) fn stream_bytes(stream: &lopdf::Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Concatenate the page's content streams (`/Contents` may be a single
/// stream or an array of streams).
fn content_stream_bytes(doc: &lopdf::Document, page: &lopdf::Dictionary) -> Vec<u8> {
    let Ok(contents) = page.get(b"Contents") else {
        return Vec::new();
    };

    match resolve(doc, contents) {
        lopdf::Object::Stream(stream) => stream_bytes(stream),
        lopdf::Object::Array(items) => {
            let mut bytes = Vec::new();
            for item in items {
                if let lopdf::Object::Stream(stream) = resolve(doc, item) {
                    bytes.extend_from_slice(&stream_bytes(stream));
                    bytes.push(b'\n');
                }
            }
            bytes
        }
        other => {
            tracing::warn!("unexpected /Contents object: {}", other.enum_variant());
            Vec::new()
        }
    }
}

/// Build a PDF whose pages show the given content streams with Helvetica
/// as `/F1`.
#[cfg(test)]
pub(crate) fn pdf_with_contents(pages: &[&[u8]]) -> Vec<u8> {
    pdf_with_resources(pages, helvetica_resources)
}

#[cfg(test)]
pub(crate) fn helvetica_resources(doc: &mut lopdf::Document) -> lopdf::Dictionary {
    use lopdf::dictionary;

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    dictionary! { "Font" => dictionary! { "F1" => font_id } }
}

/// `/F1` is a Type0 Identity-H font whose ToUnicode CMap maps codes 1 and 2
/// to `1`, 3 to `.` and 4 to `0`.
#[cfg(test)]
pub(crate) fn type0_resources(doc: &mut lopdf::Document) -> lopdf::Dictionary {
    use lopdf::{Stream, dictionary};

    let cmap = b"/CIDInit /ProcSet findresource begin 12 dict begin begincmap
1 begincodespacerange <0000> <FFFF> endcodespacerange
2 beginbfchar
<0003> <002E>
<0004> <0030>
endbfchar
1 beginbfrange
<0001> <0002> [<0031> <0031>]
endbfrange
endcmap end end";
    let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.to_vec()));
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "Arial",
    });
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "Arial",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![descendant.into()],
        "ToUnicode" => to_unicode,
    });
    dictionary! { "Font" => dictionary! { "F1" => font_id } }
}

/// Build a PDF whose pages show the given content streams and share the
/// resource dictionary built by `resources`.
#[cfg(test)]
pub(crate) fn pdf_with_resources(
    pages: &[&[u8]],
    resources: impl FnOnce(&mut lopdf::Document) -> lopdf::Dictionary,
) -> Vec<u8> {
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources = resources(&mut doc);

    let mut kids: Vec<Object> = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources.clone(),
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_counts_pages() {
        let pdf = pdf_with_contents(&[b"BT (a) Tj ET", b"BT (b) Tj ET", b""]);
        let doc = LopdfDocument::open(&pdf).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn open_rejects_garbage() {
        let err = LopdfDocument::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn page_content_bytes() {
        let pdf = pdf_with_contents(&[b"BT (Bakongan) Tj ET"]);
        let doc = LopdfDocument::open(&pdf).unwrap();
        assert_eq!(doc.page_content(0).unwrap().content, b"BT (Bakongan) Tj ET");
    }

    #[test]
    fn page_index_out_of_range() {
        let pdf = pdf_with_contents(&[b""]);
        let doc = LopdfDocument::open(&pdf).unwrap();
        assert!(doc.page_content(1).is_err());
    }

    #[test]
    fn text_runs_of_page() {
        let pdf = pdf_with_contents(&[b"BT /F1 10 Tf 72 700 Td (Kluet) Tj 0 -14 Td (Utara) Tj ET"]);
        let doc = LopdfDocument::open(&pdf).unwrap();
        let runs = doc.page_text_runs(0).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].text, "Utara");
        assert_eq!(runs[1].y, 686.0);
    }

    #[test]
    fn malformed_stream_is_skipped() {
        let pdf = pdf_with_contents(&[b"BT (unterminated Tj ET"]);
        let doc = LopdfDocument::open(&pdf).unwrap();
        assert!(doc.page_text_runs(0).unwrap().is_empty());
    }

    #[test]
    fn fonts_are_resolved_with_the_content() {
        let pdf = pdf_with_resources(&[b"BT /F1 10 Tf (x) Tj ET"], type0_resources);
        let doc = LopdfDocument::open(&pdf).unwrap();
        let page = doc.page_content(0).unwrap();
        let font = page.resources.font("F1").unwrap();
        assert!(font.is_composite());
        assert_eq!(font.decode(&[0, 1, 0, 3, 0, 4]), "1.0");
        assert!(page.resources.font("F2").is_none());
    }

    #[test]
    fn inherited_resources_are_used() {
        use lopdf::{Document, Object, Stream, dictionary};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let resources = type0_resources(&mut doc);
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            b"BT /F1 10 Tf 72 700 Td <00010004> Tj ET".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut pdf = Vec::new();
        doc.save_to(&mut pdf).unwrap();

        let doc = LopdfDocument::open(&pdf).unwrap();
        let runs = doc.page_text_runs(0).unwrap();
        assert_eq!(runs[0].text, "10");
    }
}
