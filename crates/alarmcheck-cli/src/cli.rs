//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// alarmcheck: validate alarm record files against the alarm schema
#[derive(Parser)]
#[command(name = "alarmcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a delimited alarm file and report every failing cell
    Validate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report layout
        #[arg(short, long, default_value = "grouped")]
        format: OutputFormat,

        /// Field delimiter (single character or "tab"; auto-detected if omitted)
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Treat the first line as data; columns are named column_1..column_N
        #[arg(long)]
        no_header: bool,

        /// Placeholder shown for missing required text values
        #[arg(long, default_value = alarmcheck::validation::DEFAULT_MISSING_SENTINEL)]
        sentinel: String,
    },

    /// Print the alarm schema
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Failures grouped by column
    Grouped,
    /// One block per failing cell
    PerFailure,
    /// JSON document
    Json,
}

impl From<OutputFormat> for alarmcheck::ReportFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Grouped => alarmcheck::ReportFormat::Grouped,
            OutputFormat::PerFailure => alarmcheck::ReportFormat::PerFailure,
            OutputFormat::Json => alarmcheck::ReportFormat::Json,
        }
    }
}
