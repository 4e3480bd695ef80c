//! Page range expressions such as `1-2,5,7-10`.
//!
//! Input is 1-indexed and inclusive. Parsing and bounds checking are separate
//! steps so that a malformed expression is always reported as
//! [`ExtractError::InvalidRange`], even when it would also be out of bounds.

use std::fmt;

use crate::error::ExtractError;

/// A normalized set of 1-based page numbers stored as sorted, non-adjacent
/// inclusive intervals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRange {
    intervals: Vec<(usize, usize)>,
}

impl PageRange {
    /// Parse a range expression without checking it against a document.
    ///
    /// Accepts comma-separated integers or `start-end` intervals with no
    /// whitespace. Overlapping and adjacent intervals are merged.
    pub fn parse(input: &str) -> Result<Self, ExtractError> {
        if input.is_empty() {
            return Err(ExtractError::InvalidRange("empty expression".to_string()));
        }

        let mut intervals = Vec::new();

        for part in input.split(',') {
            if part.is_empty() {
                return Err(ExtractError::InvalidRange(format!(
                    "empty segment in '{input}'"
                )));
            }

            if let Some((start_str, end_str)) = part.split_once('-') {
                if start_str.is_empty() || end_str.is_empty() {
                    return Err(ExtractError::InvalidRange(format!(
                        "unexpected unbounded interval '{part}'"
                    )));
                }
                let start = parse_page_number(start_str, part)?;
                let end = parse_page_number(end_str, part)?;
                if start > end {
                    return Err(ExtractError::InvalidRange(format!(
                        "interval '{part}' ends before it starts"
                    )));
                }
                intervals.push((start, end));
            } else {
                let page = parse_page_number(part, part)?;
                intervals.push((page, page));
            }
        }

        Ok(Self::from_intervals(intervals))
    }

    /// A range covering every page of a document with `page_count` pages.
    pub fn all(page_count: usize) -> Self {
        if page_count == 0 {
            return Self::default();
        }
        Self {
            intervals: vec![(1, page_count)],
        }
    }

    fn from_intervals(mut intervals: Vec<(usize, usize)>) -> Self {
        intervals.sort_unstable();

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => {
                    last.1 = last.1.max(end);
                }
                _ => merged.push((start, end)),
            }
        }

        Self { intervals: merged }
    }

    /// Fail with [`ExtractError::RangeExceeded`] if any page lies outside
    /// `1..=page_count`.
    pub fn check_bounds(&self, page_count: usize) -> Result<(), ExtractError> {
        for &(start, end) in &self.intervals {
            if start < 1 {
                return Err(ExtractError::RangeExceeded {
                    page: start,
                    page_count,
                });
            }
            if end > page_count {
                return Err(ExtractError::RangeExceeded {
                    page: end,
                    page_count,
                });
            }
        }
        Ok(())
    }

    /// The normalized intervals.
    pub fn intervals(&self) -> &[(usize, usize)] {
        &self.intervals
    }

    /// Every page number in ascending order (1-based).
    pub fn pages(&self) -> Vec<usize> {
        self.intervals
            .iter()
            .flat_map(|&(start, end)| start..=end)
            .collect()
    }

    /// Number of pages in the range.
    pub fn len(&self) -> usize {
        self.intervals
            .iter()
            .map(|&(start, end)| end - start + 1)
            .sum()
    }

    /// Whether the range selects no pages.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &(start, end)) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

fn parse_page_number(text: &str, part: &str) -> Result<usize, ExtractError> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExtractError::InvalidRange(format!("invalid input '{part}'")));
    }
    text.parse()
        .map_err(|_| ExtractError::InvalidRange(format!("invalid page number '{text}'")))
}

/// Resolve an optional range expression against a document's page count.
///
/// `None` selects every page. Parse errors win over bounds errors.
pub fn resolve_page_range(
    input: Option<&str>,
    page_count: usize,
) -> Result<PageRange, ExtractError> {
    let range = match input {
        Some(expr) => PageRange::parse(expr)?,
        None => PageRange::all(page_count),
    };
    range.check_bounds(page_count)?;
    Ok(range)
}
