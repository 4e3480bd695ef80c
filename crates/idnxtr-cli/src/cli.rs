use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use idnxtr::{EntityKind, OutputFormat};

/// Extract Indonesia area data (regencies, districts, islands, villages) from PDF.
#[derive(Debug, Parser)]
#[command(
    name = "idnxtr",
    about,
    version,
    after_help = "EXAMPLES:\n  \
        idnxtr regencies ~/data/regencies.pdf\n  \
        idnxtr regencies ~/data/regencies.pdf -r 1-2,5,7-10 -R\n  \
        idnxtr villages ~/data/villages.pdf --compare ~/data/villages.csv\n  \
        idnxtr regencies ~/data/raw-regencies.txt"
)]
pub struct Cli {
    /// Kind of area to extract
    #[arg(value_enum, value_name = "DATA")]
    pub data: DataArg,

    /// Path to the PDF document or to a text file with one row per line
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Compare the extracted data with a previously published CSV
    #[arg(short = 'c', long = "compare", value_name = "CSV")]
    pub compare: Option<PathBuf>,

    /// Folder to write the output to. Default: current directory
    #[arg(short = 'd', long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Output file name without the extension. Default: the DATA name
    #[arg(short = 'o', long, value_name = "NAME")]
    pub output: Option<String>,

    /// PDF pages to extract (e.g. '1-2,5,7-10'). Default: all pages
    #[arg(short = 'r', long, value_name = "RANGE")]
    pub range: Option<String>,

    /// Save the extracted raw text into a .txt file (PDF input only)
    #[arg(short = 'R', long)]
    pub save_raw: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    /// Time allowed for matching a single row, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub match_timeout: u64,

    /// Replace the built-in divider word table (lines of `word,typo1,typo2`)
    #[arg(long, value_name = "FILE")]
    pub divider_words: Option<PathBuf>,

    /// Disable all logs and progress output
    #[arg(long)]
    pub silent: bool,
}

/// Kind of area to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataArg {
    Regencies,
    Districts,
    Islands,
    Villages,
}

impl From<DataArg> for EntityKind {
    fn from(value: DataArg) -> Self {
        match value {
            DataArg::Regencies => EntityKind::Regencies,
            DataArg::Districts => EntityKind::Districts,
            DataArg::Islands => EntityKind::Islands,
            DataArg::Villages => EntityKind::Villages,
        }
    }
}

/// Output format for the extracted dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Comma-separated values with a header line
    Csv,
    /// Pretty-printed JSON array of objects
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}
