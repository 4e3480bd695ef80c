//! Transformer tests over text fixtures shaped like extracted gazetteer pages.

use std::path::PathBuf;

use idnxtr_core::{
    EntityKind, Record, RowOptions, extract_rows, to_csv_string, transform_many,
};

fn fixture_rows(name: &str) -> Vec<String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path).unwrap();
    extract_rows(&text, RowOptions::clean())
}

fn triples(records: &[Record]) -> Vec<(String, String, String)> {
    records
        .iter()
        .map(|r| {
            (
                r.code().to_string(),
                r.parent_code().to_string(),
                r.name().to_string(),
            )
        })
        .collect()
}

fn owned(expected: &[(&str, &str, &str)]) -> Vec<(String, String, String)> {
    expected
        .iter()
        .map(|(a, b, c)| (a.to_string(), b.to_string(), c.to_string()))
        .collect()
}

#[test]
fn regencies_fixture() {
    let records = transform_many(EntityKind::Regencies, &fixture_rows("regencies.txt"));
    assert_eq!(
        triples(&records),
        owned(&[
            ("1102", "11", "KABUPATEN ACEH TENGGARA"),
            ("1103", "11", "KABUPATEN ACEH TIMUR"),
            ("1171", "11", "KOTA BANDA ACEH"),
        ])
    );
}

#[test]
fn districts_fixture() {
    let records = transform_many(EntityKind::Districts, &fixture_rows("districts.txt"));
    assert_eq!(
        triples(&records),
        owned(&[
            ("110101", "1101", "BAKONGAN"),
            ("110102", "1101", "KLUET UTARA"),
            ("110103", "1101", "KLUET SELATAN"),
            ("110104", "1101", "LABUHANHAJI"),
        ])
    );
}

#[test]
fn islands_fixture() {
    let records = transform_many(EntityKind::Islands, &fixture_rows("islands.txt"));
    let islands: Vec<_> = records
        .iter()
        .map(|r| match r {
            Record::Island(island) => island.clone(),
            other => panic!("unexpected record {other:?}"),
        })
        .collect();

    let codes: Vec<_> = islands.iter().map(|i| i.code.as_str()).collect();
    assert_eq!(
        codes,
        [
            "110140002",
            "130040001",
            "217140308",
            "217140309",
            "217140320",
            "520140031",
            "710340118",
        ]
    );

    assert_eq!(islands[0].coordinate, "03°24'55.00\" N 097°04'21.00\" E");
    assert_eq!(islands[0].name, "Pulau Batutunggal");
    assert_eq!(islands[1].regency_code, "");
    assert_eq!(islands[1].coordinate, "00°45'38.07\" S 099°59'47.69\" E");
    assert!(islands[3].is_populated);
    assert_eq!(islands.iter().filter(|i| i.is_populated).count(), 1);
    assert!(islands.iter().all(|i| !i.is_outermost_small));
    assert_eq!(islands[5].name, "Gili Sarang Timur");
}

#[test]
fn villages_fixture() {
    let records = transform_many(EntityKind::Villages, &fixture_rows("villages.txt"));
    assert_eq!(
        triples(&records),
        owned(&[
            ("1101012001", "110101", "KEUDE BAKONGAN"),
            ("1101012002", "110101", "UJONG MANGKI"),
            ("1101012015", "110101", "DARUL IKHSAN"),
            ("1111052003", "111105", "MATANG GLUMPANG DUA MNS. TIMU (X)"),
            ("1114022010", "111402", "DATAR LUAS"),
            ("1219112003", "121911", "PERKEBUNAN TANAH DATAR"),
            ("1307042001", "130704", "TJ. HARO SIKABU-KABU PD. PANJANG"),
        ])
    );
}

#[test]
fn parent_code_is_a_prefix() {
    for (kind, file) in [
        (EntityKind::Regencies, "regencies.txt"),
        (EntityKind::Districts, "districts.txt"),
        (EntityKind::Islands, "islands.txt"),
        (EntityKind::Villages, "villages.txt"),
    ] {
        for record in transform_many(kind, &fixture_rows(file)) {
            assert!(
                record.code().starts_with(record.parent_code()),
                "{kind}: {} is not under {}",
                record.code(),
                record.parent_code()
            );
        }
    }
}

#[test]
fn csv_starts_with_header() {
    let records = transform_many(EntityKind::Islands, &fixture_rows("islands.txt"));
    let csv = to_csv_string(EntityKind::Islands, &records).unwrap();
    assert!(csv.starts_with("code,regency_code,coordinate,is_populated,is_outermost_small,name\n"));
    assert_eq!(csv.lines().count(), records.len() + 1);
    assert!(csv.contains(r#"217140309,2171,"00°37'37.99\" N 104°05'28.00\" E",1,0,Pulau Petong"#));
}
