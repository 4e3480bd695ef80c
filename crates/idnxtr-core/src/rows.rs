//! Row extraction from raw text.

/// Options for [`extract_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowOptions {
    /// Remove whitespace at the beginning and the end of each row.
    pub trim: bool,
    /// Drop rows that are empty (after trimming, when `trim` is set).
    pub remove_empty: bool,
}

impl RowOptions {
    /// Trim every row and drop the empty ones. This is what the pipeline uses.
    pub fn clean() -> Self {
        Self {
            trim: true,
            remove_empty: true,
        }
    }
}

/// Split text into rows on `\n`, preserving order and duplicates.
pub fn extract_rows(text: &str, options: RowOptions) -> Vec<String> {
    text.split('\n')
        .map(|row| if options.trim { row.trim() } else { row })
        .filter(|row| !options.remove_empty || !row.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = " 1\n2 \n\n  \n3\n3\n";

    #[test]
    fn default_keeps_everything() {
        let rows = extract_rows(SAMPLE, RowOptions::default());
        assert_eq!(rows, vec![" 1", "2 ", "", "  ", "3", "3", ""]);
    }

    #[test]
    fn trim_only() {
        let rows = extract_rows(
            SAMPLE,
            RowOptions {
                trim: true,
                remove_empty: false,
            },
        );
        assert_eq!(rows[0], "1");
        assert_eq!(rows.len(), 7);
    }

    #[test]
    fn remove_empty_without_trim_keeps_blank_rows() {
        let rows = extract_rows(
            SAMPLE,
            RowOptions {
                trim: false,
                remove_empty: true,
            },
        );
        assert_eq!(rows, vec![" 1", "2 ", "  ", "3", "3"]);
    }

    #[test]
    fn clean_rows() {
        let rows = extract_rows(SAMPLE, RowOptions::clean());
        assert_eq!(rows, vec!["1", "2", "3", "3"]);
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let rows = extract_rows("a\r\nb\r\n", RowOptions::clean());
        assert_eq!(rows, vec!["a", "b"]);
    }
}
