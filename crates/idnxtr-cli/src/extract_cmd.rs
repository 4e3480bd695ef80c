use idnxtr::{
    DiffSummary, Extractor, ExtractorOptions, Progress, TransformOptions,
    idnxtr_core::DividerWordList,
};

use crate::cli::Cli;
use crate::shared::ProgressReporter;

fn options_from(cli: &Cli) -> Result<ExtractorOptions, idnxtr::ExtractError> {
    let divider_words = cli
        .divider_words
        .as_ref()
        .map(DividerWordList::load)
        .transpose()?;

    let mut options = ExtractorOptions::new(cli.data.into(), &cli.file);
    options.destination = cli.destination.clone();
    options.output = cli.output.clone();
    options.range = cli.range.clone();
    options.save_raw = cli.save_raw;
    options.compare_with = cli.compare.clone();
    options.format = cli.format.into();
    options.transform = TransformOptions {
        match_timeout: std::time::Duration::from_millis(cli.match_timeout),
        divider_words,
        ..TransformOptions::default()
    };
    Ok(options)
}

fn diff_line(diff: &DiffSummary) -> String {
    if diff.is_empty() {
        "no differences with the previous data".to_string()
    } else {
        format!(
            "{} added, {} removed, {} changed",
            diff.added, diff.removed, diff.changed
        )
    }
}

pub fn run(cli: &Cli) -> Result<(), i32> {
    let fail = |e: idnxtr::ExtractError| {
        eprintln!("Error: {e}");
        1
    };

    let extractor = Extractor::new(options_from(cli).map_err(fail)?).map_err(fail)?;
    let reporter = ProgressReporter::new(cli.silent);

    reporter.start("Extracting data");
    let summary = extractor
        .run_with_progress(|progress| {
            reporter.report(&progress);
            if matches!(progress, Progress::RowsExtracted { .. }) {
                reporter.start("Transforming data");
            }
        })
        .map_err(fail)?;

    tracing::debug!(?summary, "run summary");

    if !cli.silent {
        if let (Some(diff), Some(path)) = (&summary.diff, &summary.diff_path) {
            println!("{} ({})", diff_line(diff), path.display());
        }
        println!("\nDone!");
    }
    Ok(())
}
