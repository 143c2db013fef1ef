use crate::{summarize, ReportFormat};
use anyhow::Result;
use log::{debug, error};
use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Printed to the console instead of a table when no line could be classified.
pub const NO_DATA_MESSAGE: &str = "No data to display.";

#[derive(Debug, Error)]
#[error("failed to write report to '{}': {source}", .filename.display())]
pub struct ReportWriteError {
    filename: PathBuf,
    #[source]
    source: io::Error,
}

impl ReportWriteError {
    pub fn filename(&self) -> &Path {
        &self.filename
    }
}

/// Analyze the log files and write the report to `out`, or a short notice if there is nothing to show.
pub fn print_report<W, I, P>(out: &mut W, paths: I, format: ReportFormat) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let summary = summarize(paths);
    // Nothing was counted, so there is no table worth showing
    if summary.total_requests == 0 {
        writeln!(out, "{}", NO_DATA_MESSAGE)?;
    } else {
        writeln!(out, "{}", format.render(&summary)?)?;
    }
    Ok(())
}

/// The file a report named `stem` is saved to, e.g. `weekly` becomes `weekly.txt`.
pub fn report_path(stem: &str, format: ReportFormat) -> PathBuf {
    PathBuf::from(format!("{}.{}", stem, format.extension()))
}

/// Analyze the log files and append the report to the file named after `stem`.
///
/// The report is written even when it is empty. Failures are logged rather than returned;
/// the path written to is returned on success.
pub fn save_report_to_file<I, P>(stem: &str, paths: I, format: ReportFormat) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let filename = report_path(stem, format);
    // Analyze the logs and render, even if nothing was counted
    let summary = summarize(paths);
    let report = match format.render(&summary) {
        Ok(report) => report,
        Err(error) => {
            error!("Error rendering report for '{}': {}", filename.display(), error);
            return None;
        }
    };
    // Append to the report file, logging rather than returning any failure
    match append_report(&filename, &report) {
        Ok(()) => Some(filename),
        Err(error) => {
            error!("Error saving report to file '{}': {}", error.filename().display(), error);
            None
        }
    }
}

/// Append `report` and a trailing newline to `filename`, creating the file if needed.
pub fn append_report(filename: impl AsRef<Path>, report: &str) -> Result<(), ReportWriteError> {
    let filename = filename.as_ref();
    debug!("Appending report to {}", filename.display());
    let wrap = |source| ReportWriteError {
        filename: filename.to_owned(),
        source,
    };
    // Open for appending, creating the file on first use
    let mut file = OpenOptions::new().create(true).append(true).open(filename).map_err(wrap)?;
    writeln!(file, "{}", report).map_err(wrap)?;
    file.flush().map_err(wrap)
}
