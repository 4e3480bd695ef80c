//! Shared fixtures for the facade integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};

/// Directory holding the text fixtures shared by the workspace.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn pdf_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// A content stream printing each row on its own line, 16pt apart.
pub fn rows_content(rows: &[&str]) -> Vec<u8> {
    let mut ops = String::from("BT\n/F1 9 Tf\n40 800 Td\n");
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            ops.push_str("0 -16 Td\n");
        }
        ops.push_str(&format!("({}) Tj\n", pdf_escape(row)));
    }
    ops.push_str("ET\n");
    ops.into_bytes()
}

/// Build a PDF with one page per row list.
pub fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for rows in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, rows_content(rows)));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
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
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a PDF built from `pages` to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).unwrap();
    path
}

/// Two pages of district rows, with headers and a page footer.
pub const DISTRICT_PAGES: [&[&str]; 2] = [
    &[
        "KODE NAMA KECAMATAN JUMLAH KETERANGAN",
        "11.01.01 Bakongan 7 7",
        "11.01.02 Kluet Utara 21 21",
    ],
    &[
        "11.01.03 Kluet Selatan 11 Pemekaran Perda 2005 sesuai UU",
        "11.01.04 Labuhanhaji 23 16 Perubahan nama Kec Labuhan Haji",
        "Halaman 2",
    ],
];
