//! Divider words: the vocabulary that separates an area name from the
//! administrative remarks that follow it on the same row.
//!
//! The built-in table lives in `data/divider-words.csv`. Each line holds a
//! canonical word followed by known misspellings found in published
//! documents: `canonical,typo1,typo2`.

use std::path::Path;
use std::sync::LazyLock;

use crate::error::ExtractError;

static BUILTIN_TABLE: &str = include_str!("../data/divider-words.csv");

static BUILTIN: LazyLock<DividerWordList> = LazyLock::new(|| DividerWordList::parse(BUILTIN_TABLE));

/// Options for selecting divider words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DividerWordOptions {
    /// Include the misspelled variants.
    pub with_typos: bool,
    /// Words removed after inclusion (exact match, lowercase).
    pub excluded_words: Vec<String>,
}

impl DividerWordOptions {
    /// Canonical words plus every typo variant.
    pub fn with_typos() -> Self {
        Self {
            with_typos: true,
            excluded_words: Vec::new(),
        }
    }

    /// Remove the given words from the selection.
    pub fn excluding(mut self, words: &[&str]) -> Self {
        self.excluded_words
            .extend(words.iter().map(|w| w.to_lowercase()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DividerEntry {
    word: String,
    typos: Vec<String>,
}

/// A parsed divider word table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DividerWordList {
    entries: Vec<DividerEntry>,
}

impl DividerWordList {
    /// Parse a table in `canonical,typo1,typo2` form. Blank lines and blank
    /// cells are ignored; words are lowercased.
    pub fn parse(table: &str) -> Self {
        let entries = table
            .lines()
            .filter_map(|line| {
                let mut cells = line
                    .split(',')
                    .map(|cell| cell.trim().to_lowercase())
                    .filter(|cell| !cell.is_empty());
                let word = cells.next()?;
                Some(DividerEntry {
                    word,
                    typos: cells.collect(),
                })
            })
            .collect();

        Self { entries }
    }

    /// Load a table from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let table = std::fs::read_to_string(path)?;
        Ok(Self::parse(&table))
    }

    /// The table compiled into the library.
    pub fn builtin() -> &'static DividerWordList {
        &BUILTIN
    }

    /// Select words according to `options`, in table order.
    pub fn words(&self, options: &DividerWordOptions) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();

        for entry in &self.entries {
            let candidates = std::iter::once(&entry.word)
                .chain(entry.typos.iter().filter(|_| options.with_typos));
            for word in candidates {
                if !words.contains(word) {
                    words.push(word.clone());
                }
            }
        }

        words.retain(|word| !options.excluded_words.contains(word));
        words
    }

    /// Number of canonical entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Divider words from the built-in table.
pub fn divider_words(options: &DividerWordOptions) -> Vec<String> {
    DividerWordList::builtin().words(options)
}

/// Build a regex alternation (without delimiters) matching any of `words`
/// literally.
pub fn alternation(words: &[String]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Case-insensitive test for "text starts with a divider word".
#[derive(Debug, Clone)]
pub struct DividerPrefix {
    regex: Option<regex::Regex>,
}

impl DividerPrefix {
    /// Compile a prefix test for `words`. An empty word list never matches.
    pub fn new(words: &[String]) -> Self {
        let regex = if words.is_empty() {
            None
        } else {
            match regex::Regex::new(&format!(r"(?i)^(?:{})\b", alternation(words))) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("divider words ignored: {e}");
                    None
                }
            }
        };
        Self { regex }
    }

    /// Whether `text` begins with a divider word followed by a word boundary.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }
}
