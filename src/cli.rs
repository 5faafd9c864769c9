use crate::commands::renumber::RenumberOptions;
use crate::error::UsageError;
use crate::pdf::stamp::StampStyle;
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "renumerator")]
#[command(about = "Document splitter and renumerator")]
#[command(version)]
pub struct Cli {
    /// PDF file to process
    #[arg(value_name = "filename.pdf")]
    pub path: PathBuf,

    /// Page range to extract (e.g., "3-10")
    #[arg(value_name = "start-end", allow_hyphen_values = true)]
    pub pages: String,

    /// Directory the numbered PDF is written to
    #[arg(short, long, default_value = "out")]
    pub out_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn options(&self) -> RenumberOptions {
        RenumberOptions {
            input: self.path.clone(),
            pages: self.pages.clone(),
            out_dir: self.out_dir.clone(),
            style: StampStyle::default(),
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Print the usage line followed by `<program>: error: <message>`.
pub fn report_usage_error(error: &UsageError) {
    let mut command = Cli::command();
    let usage = command.render_usage();
    println!("{}", usage);
    println!("{}: error: {}", command.get_name(), error);
}
