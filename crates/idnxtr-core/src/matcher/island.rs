use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{MatchBudget, Matcher, captures_within};
use crate::coordinate::{Compass, Coordinate, Dms};
use crate::record::{Island, strip_dots};

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"([0-9]{2}\.[0-9]{2}\.4[0-9]{4})\s(.+)\s",
        r#"([0-8][0-9]|90)°\s?([0-5][0-9]|60)'\s?([0-5][0-9]\.?[0-9]{0,2}|60\.00)""?\s(U|S)\s"#,
        r#"(0[0-9]{2}|1(?:[0-7][0-9]|80))°\s?([0-5][0-9]|60)'\s?([0-5][0-9]\.?[0-9]{0,2}|60\.00)""?\s(B|T)"#,
        r"\s*(\D*)",
    ))
    .expect("island row pattern")
});

static POPULATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bBP\b").expect("populated marker pattern"));

static OUTERMOST_SMALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPPKT\b").expect("outermost marker pattern"));

/// Matches `NN.NN.4NNNN <name> <lat> <U|S> <lon> <B|T> [descriptor]` rows.
///
/// The descriptor column carries `BP` (berpenghuni, populated) and `PPKT`
/// (pulau-pulau kecil terluar, outermost small island) markers. Island names
/// keep their source case.
#[derive(Debug, Clone, Default)]
pub struct IslandMatcher {
    budget: MatchBudget,
}

impl IslandMatcher {
    pub fn new(budget: MatchBudget) -> Self {
        Self { budget }
    }
}

fn dms(caps: &Captures<'_>, first_group: usize) -> Option<Dms> {
    let group = |i: usize| caps.get(first_group + i).map(|m| m.as_str());
    Some(Dms::new(
        group(0)?,
        group(1)?,
        group(2)?,
        Compass::from_letter(group(3)?)?,
    ))
}

/// Regency part of an island code; islands directly under a province
/// (`NN.00.4NNNN`) have none.
fn regency_code(code: &str) -> String {
    if &code[2..4] == "00" {
        String::new()
    } else {
        code[..4].to_string()
    }
}

impl Matcher for IslandMatcher {
    type Output = Island;

    fn pattern(&self) -> &Regex {
        &ROW
    }

    fn transform(&self, row: &str) -> Option<Island> {
        let deadline = self.budget.start();
        let caps = captures_within(&ROW, row, &deadline)?;

        let code = strip_dots(caps.get(1)?.as_str());
        let name = caps.get(2)?.as_str().trim();
        let coordinate = Coordinate {
            latitude: dms(&caps, 3)?,
            longitude: dms(&caps, 7)?,
        };
        let descriptor = caps.get(11).map_or("", |m| m.as_str());

        Some(Island {
            regency_code: regency_code(&code),
            code,
            coordinate: coordinate.to_string(),
            is_populated: POPULATED.is_match(descriptor),
            is_outermost_small: OUTERMOST_SMALL.is_match(descriptor),
            name: name.to_string(),
        })
    }
}
