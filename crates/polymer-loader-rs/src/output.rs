//! Run summary reporting.

use crate::cli::OutputFormat;
use camino::Utf8PathBuf;
use serde::Serialize;

/// The result of transforming one file.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    /// The input file.
    pub file: Utf8PathBuf,
    /// The generated module, if the transform succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<Utf8PathBuf>,
    /// The failure message, if it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counts for one run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Files transformed successfully.
    pub transformed: usize,
    /// Files that failed.
    pub failed: usize,
}

/// Prints per-file outcomes and the run summary, returning the counts.
pub fn report(format: OutputFormat, outcomes: &[FileOutcome]) -> RunSummary {
    let summary = RunSummary {
        transformed: outcomes.iter().filter(|o| o.error.is_none()).count(),
        failed: outcomes.iter().filter(|o| o.error.is_some()).count(),
    };

    match format {
        OutputFormat::Human => {
            for outcome in outcomes {
                match (&outcome.generated, &outcome.error) {
                    (Some(generated), _) => println!("{} -> {}", outcome.file, generated),
                    (_, Some(error)) => eprintln!("{}: {}", outcome.file, error),
                    _ => {}
                }
            }
            println!(
                "{} transformed, {} failed",
                summary.transformed, summary.failed
            );
        }
        OutputFormat::Json => {
            let record = serde_json::json!({
                "files": outcomes,
                "summary": &summary,
            });
            println!("{}", record);
        }
    }

    summary
}
