use crate::{classify::classify_line, FileLoadError, LevelCounts, LineSource, SeverityLevel};
use log::{debug, error};
use std::{collections::HashMap, path::Path};

/// Severity counts per endpoint, kept in the order endpoints were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<(String, LevelCounts)>,
    positions: HashMap<String, usize>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts for `endpoint`, inserting a zeroed entry if it hasn't been seen yet.
    pub fn counts_mut(&mut self, endpoint: &str) -> &mut LevelCounts {
        let position = match self.positions.get(endpoint) {
            Some(&position) => position,
            None => {
                self.entries.push((endpoint.to_owned(), LevelCounts::new()));
                self.positions.insert(endpoint.to_owned(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    pub fn record(&mut self, endpoint: &str, level: SeverityLevel) {
        self.counts_mut(endpoint).increment(level);
    }

    /// Classify one line and count it if it names both an endpoint and a level.
    /// Returns whether the line was counted.
    pub fn add_line(&mut self, line: &str) -> bool {
        match classify_line(line) {
            Some((endpoint, level)) => {
                self.record(endpoint, level);
                true
            }
            None => false,
        }
    }

    /// Stream every line of the file at `path` into the report.
    ///
    /// If reading fails part way through, lines read before the failure stay counted.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<(), FileLoadError> {
        for line in LineSource::open(path)? {
            self.add_line(&line?);
        }
        Ok(())
    }

    pub fn get(&self, endpoint: &str) -> Option<&LevelCounts> {
        self.positions.get(endpoint).map(|&position| &self.entries[position].1)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LevelCounts)> {
        self.entries.iter().map(|(endpoint, counts)| (endpoint.as_str(), counts))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a report from `(endpoint, counts)` pairs. Repeated endpoints have their counts added.
impl FromIterator<(String, LevelCounts)> for Report {
    fn from_iter<I: IntoIterator<Item = (String, LevelCounts)>>(iter: I) -> Self {
        let mut report = Report::new();
        for (endpoint, counts) in iter {
            *report.counts_mut(&endpoint) += counts;
        }
        report
    }
}

/// Analyze the given log files in order, logging each file that fails to load.
pub fn analyze<I, P>(paths: I) -> Report
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    analyze_with(paths, |error| log_failure(&error))
}

/// The diagnostic logged for a log file that couldn't be processed.
pub fn failure_message(error: &FileLoadError) -> String {
    format!("Error processing file '{}': {}", error.path().display(), error)
}

fn log_failure(error: &FileLoadError) {
    error!("{}", failure_message(error));
}

/// Analyze the given log files in order. Each file that fails to load is passed to `on_failure`
/// and skipped; it does not stop the run.
pub fn analyze_with<I, P, F>(paths: I, mut on_failure: F) -> Report
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    F: FnMut(FileLoadError),
{
    // A fresh report per run, so repeated runs never accumulate
    let mut report = Report::new();
    for path in paths {
        let path = path.as_ref();
        debug!("Reading {}", path.display());
        // Lines counted before a failure stay counted
        if let Err(error) = report.add_file(path) {
            on_failure(error);
        }
    }
    report
}

/// Sum each level's counter across every endpoint.
pub fn total_per_level(report: &Report) -> LevelCounts {
    report.iter().fold(LevelCounts::new(), |mut total, (_, counts)| {
        total += *counts;
        total
    })
}

/// Sum of all counters. Zero means there is nothing to report.
pub fn total_requests(totals: &LevelCounts) -> u64 {
    totals.sum()
}

/// A report together with its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub report: Report,
    pub totals: LevelCounts,
    pub total_requests: u64,
}

impl Summary {
    pub fn from_report(report: Report) -> Self {
        let totals = total_per_level(&report);
        let total_requests = total_requests(&totals);
        Self {
            report,
            totals,
            total_requests,
        }
    }
}

/// Run the whole pipeline over the given log files.
pub fn summarize<I, P>(paths: I) -> Summary
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Summary::from_report(analyze(paths))
}
