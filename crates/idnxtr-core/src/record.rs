//! Administrative-area records.
//!
//! Codes are dot-free digit strings; the parent code of every record is a
//! prefix of its own code.

use serde::Serialize;

/// Strip the dots from a printed code (`11.01.04` → `110104`).
pub fn strip_dots(code: &str) -> String {
    code.chars().filter(|c| *c != '.').collect()
}

/// Fixed-order CSV projection of a record.
pub trait CsvRecord {
    /// Column headers, in output order.
    const HEADER: &'static [&'static str];

    /// Field values in [`HEADER`](CsvRecord::HEADER) order.
    fn csv_row(&self) -> Vec<String>;

    /// The record's own code.
    fn code(&self) -> &str;
}

/// A regency (kabupaten) or city (kota).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Regency {
    pub code: String,
    pub province_code: String,
    pub name: String,
}

/// A district (kecamatan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct District {
    pub code: String,
    pub regency_code: String,
    pub name: String,
}

/// An island. `regency_code` is empty for islands not assigned to a regency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Island {
    pub code: String,
    pub regency_code: String,
    pub coordinate: String,
    pub is_populated: bool,
    pub is_outermost_small: bool,
    pub name: String,
}

/// A village (desa or kelurahan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Village {
    pub code: String,
    pub district_code: String,
    pub name: String,
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

impl CsvRecord for Regency {
    const HEADER: &'static [&'static str] = &["code", "province_code", "name"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.province_code.clone(),
            self.name.clone(),
        ]
    }

    fn code(&self) -> &str {
        &self.code
    }
}

impl CsvRecord for District {
    const HEADER: &'static [&'static str] = &["code", "regency_code", "name"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.regency_code.clone(),
            self.name.clone(),
        ]
    }

    fn code(&self) -> &str {
        &self.code
    }
}

impl CsvRecord for Island {
    const HEADER: &'static [&'static str] = &[
        "code",
        "regency_code",
        "coordinate",
        "is_populated",
        "is_outermost_small",
        "name",
    ];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.regency_code.clone(),
            self.coordinate.clone(),
            flag(self.is_populated),
            flag(self.is_outermost_small),
            self.name.clone(),
        ]
    }

    fn code(&self) -> &str {
        &self.code
    }
}

impl CsvRecord for Village {
    const HEADER: &'static [&'static str] = &["code", "district_code", "name"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.district_code.clone(),
            self.name.clone(),
        ]
    }

    fn code(&self) -> &str {
        &self.code
    }
}

/// Any of the four record kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Regency(Regency),
    District(District),
    Island(Island),
    Village(Village),
}

impl Record {
    /// The record's own code.
    pub fn code(&self) -> &str {
        match self {
            Record::Regency(r) => r.code(),
            Record::District(d) => d.code(),
            Record::Island(i) => i.code(),
            Record::Village(v) => v.code(),
        }
    }

    /// The parent code (province, regency or district).
    pub fn parent_code(&self) -> &str {
        match self {
            Record::Regency(r) => &r.province_code,
            Record::District(d) => &d.regency_code,
            Record::Island(i) => &i.regency_code,
            Record::Village(v) => &v.district_code,
        }
    }

    /// The record name.
    pub fn name(&self) -> &str {
        match self {
            Record::Regency(r) => &r.name,
            Record::District(d) => &d.name,
            Record::Island(i) => &i.name,
            Record::Village(v) => &v.name,
        }
    }

    /// CSV field values in header order.
    pub fn csv_row(&self) -> Vec<String> {
        match self {
            Record::Regency(r) => r.csv_row(),
            Record::District(d) => d.csv_row(),
            Record::Island(i) => i.csv_row(),
            Record::Village(v) => v.csv_row(),
        }
    }
}

impl From<Regency> for Record {
    fn from(value: Regency) -> Self {
        Record::Regency(value)
    }
}

impl From<District> for Record {
    fn from(value: District) -> Self {
        Record::District(value)
    }
}

impl From<Island> for Record {
    fn from(value: Island) -> Self {
        Record::Island(value)
    }
}

impl From<Village> for Record {
    fn from(value: Village) -> Self {
        Record::Village(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_dots_from_code() {
        assert_eq!(strip_dots("11.01.04"), "110104");
        assert_eq!(strip_dots("1101"), "1101");
    }

    #[test]
    fn island_flags_render_as_digits() {
        let island = Island {
            code: "217140322".into(),
            regency_code: "2171".into(),
            coordinate: "01°12'15.00\" N 104°04'41.00\" E".into(),
            is_populated: false,
            is_outermost_small: true,
            name: "Pulau Putri".into(),
        };
        let row = island.csv_row();
        assert_eq!(row.len(), Island::HEADER.len());
        assert_eq!(row[3], "0");
        assert_eq!(row[4], "1");
    }

    #[test]
    fn record_accessors() {
        let record: Record = Village {
            code: "1101012001".into(),
            district_code: "110101".into(),
            name: "KEUDE BAKONGAN".into(),
        }
        .into();
        assert_eq!(record.code(), "1101012001");
        assert_eq!(record.parent_code(), "110101");
        assert_eq!(record.name(), "KEUDE BAKONGAN");
        assert!(record.code().starts_with(record.parent_code()));
    }

    #[test]
    fn json_uses_column_names() {
        let record: Record = Regency {
            code: "1102".into(),
            province_code: "11".into(),
            name: "KABUPATEN ACEH TENGGARA".into(),
        }
        .into();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["province_code"], "11");
        assert_eq!(json["name"], "KABUPATEN ACEH TENGGARA");
    }
}
