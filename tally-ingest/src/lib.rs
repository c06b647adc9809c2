//! tally-ingest: ledger CSV loading and the cached, reloadable ledger source.

pub mod error;
pub mod parsers;
pub mod source;
pub mod types;

pub use error::{LoadError, Result};
pub use parsers::{load_ledger, parse_ledger_csv, read_ledger_csv, MAX_ABS_AMOUNT};
pub use source::LedgerSource;
pub use types::{LoadOptions, RawRecord};
