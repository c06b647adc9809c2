//! Error types for tally-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid rule table: {0}")]
    InvalidRuleTable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
