//! alarmcheck CLI - validate alarm record files.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let result = match cli.command {
        Commands::Validate {
            file,
            output,
            format,
            delimiter,
            no_header,
            sentinel,
        } => commands::validate::run(file, output, format.into(), delimiter, no_header, sentinel),

        Commands::Schema => commands::schema::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
