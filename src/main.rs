mod cli;
mod commands;
mod error;
mod page_range;
mod pdf;

use clap::Parser;
use cli::Cli;
use error::UsageError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::new(format!("renumerator={}", cli.log_level())))
        .init();

    match commands::renumber::run(&cli.options()) {
        Ok(_) => {
            println!("Done!");
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<UsageError>() {
            Some(usage) => {
                cli::report_usage_error(usage);
                ExitCode::from(2)
            }
            None => {
                eprintln!("Error: {:?}", err);
                ExitCode::FAILURE
            }
        },
    }
}
