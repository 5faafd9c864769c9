use std::path::PathBuf;
use thiserror::Error;

/// Problems with what the user typed on the command line.
///
/// These end the run with a usage hint instead of a diagnostic; everything
/// else is reported through `anyhow`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Page format is invalid")]
    Format,

    #[error("End page must be >= start page")]
    Order,

    #[error("Start page is greater than the document size ({0})")]
    Bounds(u32),
}
