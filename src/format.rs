use crate::{LevelCounts, Report, SeverityLevel, Summary};
use std::{fmt::Write, str::FromStr};
use thiserror::Error;

const HANDLER_WIDTH: usize = 30;
const LEVEL_WIDTH: usize = 15;
const SEPARATOR_WIDTH: usize = 100;

/// Render the report as a fixed-width text table.
pub fn render(report: &Report, totals: &LevelCounts, total_requests: u64) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut lines = Vec::with_capacity(report.len() + 5);
    // Grand total, followed by a blank line
    lines.push(format!("Total requests: {}\n", total_requests));
    // Header fields are space separated, data rows are not
    let mut header = format!("{:<width$}", "HANDLER", width = HANDLER_WIDTH);
    for level in SeverityLevel::ALL {
        write!(header, " {:<width$}", level.as_str(), width = LEVEL_WIDTH).unwrap();
    }
    lines.push(header);
    lines.push(separator.clone());
    // One row per endpoint, in the order they were first seen
    for (endpoint, counts) in report.iter() {
        lines.push(row(endpoint, counts));
    }
    lines.push(separator);
    // Column totals
    lines.push(row("Total", totals));
    lines.join("\n")
}

fn row(label: &str, counts: &LevelCounts) -> String {
    let mut row = format!("{:<width$}", label, width = HANDLER_WIDTH);
    for (_, count) in counts.iter() {
        // Writing into a String can't fail
        write!(row, "{:<width$}", count, width = LEVEL_WIDTH).unwrap();
    }
    row
}

/// Render the report as CSV: a header record, one record per endpoint, then the totals.
pub fn render_csv(report: &Report, totals: &LevelCounts) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["HANDLER"];
    header.extend(SeverityLevel::ALL.iter().map(|level| level.as_str()));
    writer.write_record(&header)?;
    for (endpoint, counts) in report.iter().chain(Some(("Total", totals))) {
        let mut record = vec![endpoint.to_owned()];
        record.extend(counts.iter().map(|(_, count)| count.to_string()));
        writer.write_record(&record)?;
    }
    let bytes = writer.into_inner().map_err(|error| csv::Error::from(error.into_error()))?;
    // Fields are all UTF-8
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_owned())
}

/// How a report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
}

impl ReportFormat {
    pub const VARIANTS: [&'static str; 2] = ["table", "csv"];

    /// File extension used when a report in this format is saved.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Table => "txt",
            Self::Csv => "csv",
        }
    }

    pub fn render(self, summary: &Summary) -> Result<String, csv::Error> {
        match self {
            Self::Table => Ok(render(&summary.report, &summary.totals, summary.total_requests)),
            Self::Csv => render_csv(&summary.report, &summary.totals),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown report format '{0}', expected one of: table, csv")]
pub struct UnknownFormat(String);

impl FromStr for ReportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            _ => Err(UnknownFormat(s.to_owned())),
        }
    }
}
