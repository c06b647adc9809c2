//! Load failures. These stop a ledger from being built; the engine itself
//! never sees them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Ledger file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },

    #[error("Line {line}: invalid amount '{value}'")]
    InvalidAmount { line: u64, value: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;
