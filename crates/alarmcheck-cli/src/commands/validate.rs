//! Validate command - check a data file against the alarm schema.

use std::io;
use std::path::PathBuf;

use alarmcheck::{AlarmValidator, ParserConfig, ReportFormat, ValidatorConfig};
use alarmcheck::input::parse_delimiter;
use colored::Colorize;
use tracing::info;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: ReportFormat,
    delimiter: Option<String>,
    no_header: bool,
    sentinel: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parser = ParserConfig::default();
    if let Some(d) = delimiter {
        parser = parser.with_delimiter(parse_delimiter(&d)?);
    }
    if no_header {
        parser = parser.without_header();
    }

    let config = ValidatorConfig {
        parser,
        missing_sentinel: sentinel,
    };

    let mut run = AlarmValidator::with_config(config).run(&file)?;

    match output {
        Some(path) => {
            run.save_report(format, &path)?;
            info!(path = %path.display(), "report written");

            if run.is_valid() {
                println!("{}", alarmcheck::SUCCESS_MESSAGE.green());
            } else {
                eprintln!(
                    "{} {} failing cell(s) in {}; report saved to {}",
                    "Found".yellow().bold(),
                    run.failures.len().to_string().white().bold(),
                    file.display(),
                    path.display().to_string().white()
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            run.write_report(format, &mut handle)?;
        }
    }

    Ok(())
}
