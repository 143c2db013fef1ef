use anyhow::Result;
use env_logger::Env;
use log::info;
use logreport::ReportFormat;
use std::{io, path::PathBuf, process};
use structopt::StructOpt;

/// Report how many log entries of each severity every API endpoint produced.
#[derive(StructOpt)]
struct Options {
    /// Log files to analyze, processed in the order given
    #[structopt(parse(from_os_str))]
    log_files: Vec<PathBuf>,
    /// Append the report to <REPORT>.txt (or .csv) instead of printing it
    #[structopt(short, long)]
    report: Option<String>,
    /// Output format
    #[structopt(
        short,
        long,
        default_value = "table",
        possible_values = &ReportFormat::VARIANTS,
        case_insensitive = true
    )]
    format: ReportFormat,
}

fn main() -> Result<()> {
    // Load from .env file if it is present
    dotenv::dotenv().ok();
    // Initialize logging, showing warnings and errors unless RUST_LOG says otherwise
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    // Get command line arguments
    let options = Options::from_args();
    if options.log_files.is_empty() {
        Options::clap().print_help()?;
        println!();
        process::exit(1);
    }

    match options.report {
        Some(stem) => {
            if let Some(path) = logreport::save_report_to_file(&stem, &options.log_files, options.format) {
                info!("Report appended to {}", path.display());
            }
        }
        None => logreport::print_report(&mut io::stdout().lock(), &options.log_files, options.format)?,
    }

    Ok(())
}
