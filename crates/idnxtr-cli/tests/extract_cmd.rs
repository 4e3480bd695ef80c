//! End-to-end runs of the `idnxtr` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("idnxtr").unwrap()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

/// A PDF printing each row on its own line, one page per row list.
fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for rows in pages {
        let mut ops = String::from("BT /F1 9 Tf 40 800 Td\n");
        for row in rows.iter() {
            ops.push_str(&format!("({row}) Tj 0 -16 Td\n"));
        }
        ops.push_str("ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, ops.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
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
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

const REGENCY_PAGES: [&[&str]; 2] = [
    &["NO NAMA KABUPATEN/KOTA JUMLAH KODE", "KAB. ACEH TIMUR 24 5.427,00 11.03 419.594 513"],
    &["KOTA BANDA ACEH 9 61,36 11.71 252.899 90"],
];

#[test]
fn text_input_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("districts")
        .arg(fixture("districts.txt"))
        .arg("-d")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done!"));

    let csv = std::fs::read_to_string(dir.path().join("districts.csv")).unwrap();
    assert!(csv.starts_with("code,regency_code,name\n110101,1101,BAKONGAN\n"));
    assert_eq!(csv.lines().count(), 5);
}

#[test]
fn silent_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("regencies")
        .arg(fixture("regencies.txt"))
        .arg("--destination")
        .arg(dir.path())
        .arg("--silent")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
    assert!(dir.path().join("regencies.csv").is_file());
}

#[test]
fn pdf_input_with_range_and_raw_dump() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "kabupaten.pdf", &REGENCY_PAGES);
    cmd()
        .arg("regencies")
        .arg(&pdf)
        .args(["-r", "2", "-R", "-o", "kota"])
        .arg("-d")
        .arg(dir.path())
        .assert()
        .success();

    let csv = std::fs::read_to_string(dir.path().join("kota.csv")).unwrap();
    assert_eq!(csv, "code,province_code,name\n1171,11,KOTA BANDA ACEH\n");
    let raw = std::fs::read_to_string(dir.path().join("raw-kota.txt")).unwrap();
    assert!(raw.contains("KOTA BANDA ACEH"));
    assert!(!raw.contains("ACEH TIMUR"));
}

#[test]
fn json_format() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("villages")
        .arg(fixture("villages.txt"))
        .args(["--format", "json", "--silent"])
        .arg("-d")
        .arg(dir.path())
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("villages.json")).unwrap(),
    )
    .unwrap();
    assert!(json.as_array().is_some_and(|records| !records.is_empty()));
    assert_eq!(json[0]["district_code"], "110101");
}

#[test]
fn compare_reports_differences() {
    let dir = tempfile::tempdir().unwrap();
    let previous = dir.path().join("previous.csv");
    std::fs::write(
        &previous,
        "code,regency_code,name\n110101,1101,BAKONGAN\n110102,1101,KLUET UTARA\n",
    )
    .unwrap();

    cmd()
        .arg("districts")
        .arg(fixture("districts.txt"))
        .arg("-c")
        .arg(&previous)
        .arg("-d")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 added, 0 removed, 0 changed"));

    let report = std::fs::read_to_string(dir.path().join("districts.diff")).unwrap();
    assert!(report.contains("+110103,1101,KLUET SELATAN"));
    assert!(report.contains("+110104,1101,LABUHANHAJI"));
}

#[test]
fn invalid_output_name() {
    cmd()
        .arg("regencies")
        .arg(fixture("regencies.txt"))
        .args(["-o", "regencies.csv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: 'output' contains forbidden character(s)",
        ));
}

#[test]
fn invalid_range_format() {
    cmd()
        .arg("regencies")
        .arg(fixture("regencies.txt"))
        .args(["-r", "1-"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: 'range' format is invalid"));
}

#[test]
fn range_beyond_last_page() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "kabupaten.pdf", &REGENCY_PAGES);
    cmd()
        .arg("regencies")
        .arg(&pdf)
        .args(["-r", "1-5"])
        .arg("-d")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("page range exceeds the expected range"));
}

#[test]
fn unsupported_input_file() {
    cmd()
        .args(["regencies", "/nonexistent/regencies.pdf"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: 'file_path' must be a PDF or text file path",
        ));
}
