//! Degrees-minutes-seconds coordinates as printed in island gazetteers.

use std::fmt;

/// Compass direction of one coordinate component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    South,
    East,
    West,
}

impl Compass {
    /// Translate an Indonesian abbreviation: `U` (utara), `S` (selatan),
    /// `T` (timur), `B` (barat). English letters are accepted as well.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "U" | "N" => Some(Compass::North),
            "S" => Some(Compass::South),
            "T" | "E" => Some(Compass::East),
            "B" | "W" => Some(Compass::West),
            _ => None,
        }
    }

    /// The English letter.
    pub fn letter(self) -> char {
        match self {
            Compass::North => 'N',
            Compass::South => 'S',
            Compass::East => 'E',
            Compass::West => 'W',
        }
    }
}

/// One DMS component. Degree and minute digits keep their source padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dms {
    pub degrees: String,
    pub minutes: String,
    /// Seconds with exactly two decimals.
    pub seconds: String,
    pub compass: Compass,
}

impl Dms {
    /// Build a component from matched text; `seconds` is normalized.
    pub fn new(degrees: &str, minutes: &str, seconds: &str, compass: Compass) -> Self {
        Self {
            degrees: degrees.to_string(),
            minutes: minutes.to_string(),
            seconds: normalize_seconds(seconds),
            compass,
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°{}'{}\" {}",
            self.degrees,
            self.minutes,
            self.seconds,
            self.compass.letter()
        )
    }
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub latitude: Dms,
    pub longitude: Dms,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.latitude, self.longitude)
    }
}

/// Render seconds as `SS.ss`.
///
/// The first two digits are whole seconds; any further digits (with or
/// without a decimal point in between) are the fraction, padded or cut to two
/// places.
pub fn normalize_seconds(seconds: &str) -> String {
    let digits: String = seconds.chars().filter(char::is_ascii_digit).collect();
    let split = digits.len().min(2);
    let (whole, fraction) = digits.split_at(split);
    let fraction: String = fraction.chars().chain("00".chars()).take(2).collect();
    format!("{whole:0>2}.{fraction}")
}
