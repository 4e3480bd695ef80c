//! Page text reconstruction from positioned text runs.

/// A piece of text shown by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Baseline y in PDF user space (points, bottom-left origin).
    pub y: f64,
    /// Decoded text.
    pub text: String,
}

impl TextRun {
    /// Create a run at baseline `y`.
    pub fn new(y: f64, text: impl Into<String>) -> Self {
        Self {
            y,
            text: text.into(),
        }
    }
}

/// Options for [`assemble_lines`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOptions {
    /// Downward movement, in layout units, that starts a new line.
    pub threshold: f64,
    /// Points per layout unit.
    pub unit: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            unit: 16.0,
        }
    }
}

/// Collapse internal whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join runs into page text, one visual line per `\n`-terminated line.
///
/// Runs keep document order. A new line starts only when a run sits lower on
/// the page than the previous run by more than `options.threshold` units;
/// moving up (e.g. to the top of the next column) continues the line.
pub fn assemble_lines(runs: &[TextRun], options: &LineOptions) -> String {
    let mut page = String::new();
    let mut line = String::new();
    let mut prev_y: Option<f64> = None;

    for run in runs {
        // User space grows upward; the layout grid grows downward.
        let y = -run.y / options.unit;

        if let Some(prev) = prev_y {
            if y - prev > options.threshold && !line.is_empty() {
                page.push_str(&line);
                page.push('\n');
                line.clear();
            }
        }
        prev_y = Some(y);

        let phrase = collapse_whitespace(&run.text);
        if phrase.is_empty() {
            continue;
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&phrase);
    }

    page.push_str(&line);
    page.push('\n');
    page
}
