//! Summarize line-oriented API logs into a table of severity counts per endpoint.

pub mod classify;
pub mod commands;
pub mod format;
mod level;
pub mod report;
mod source;

pub use commands::{print_report, save_report_to_file, ReportWriteError, NO_DATA_MESSAGE};
pub use format::{render, render_csv, ReportFormat};
pub use level::{LevelCounts, SeverityLevel};
pub use report::{analyze, analyze_with, summarize, total_per_level, total_requests, Report, Summary};
pub use source::{FileLoadError, LineSource};
