//! Ledger CSV parser.
//!
//! Expected header (extra columns allowed, any order):
//!   timestamp,description,amount
//!   2024-01-05 09:00:00,Salary - Monthly,5000.00
//!   2024-01-06 08:12:44,Coffee Shop,-4.50

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use tally_core::{Ledger, RuleTable, Transaction};

use crate::error::{LoadError, Result};
use crate::types::{LoadOptions, RawRecord};

const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "description", "amount"];

/// Largest accepted magnitude for a single amount. Keeps ledger sums far from
/// `Decimal`'s range so aggregation cannot overflow.
pub const MAX_ABS_AMOUNT: i64 = 1_000_000_000_000_000;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse a timestamp in any of the accepted layouts. A bare date means midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Normalizes amounts like `-1,234.50`, `$12.00` or `-$4.50`
pub struct AmountParser {
    re: Regex,
}

impl AmountParser {
    pub fn new() -> Result<Self> {
        let re = Regex::new(concat!(
            r"^(?P<sign>[-+]?)\$?(?P<sign2>[-+]?)",
            r"(?P<int>\d{1,3}(?:,\d{3})+|\d*)",
            r"(?P<frac>\.\d+)?$"
        ))?;
        Ok(Self { re })
    }

    pub fn parse(&self, s: &str) -> Option<Decimal> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let caps = self.re.captures(&compact)?;

        let sign = match (&caps["sign"], &caps["sign2"]) {
            ("", s) | (s, "") => s,
            _ => return None,
        };
        let int = caps["int"].replace(',', "");
        let frac = caps.name("frac").map(|m| m.as_str()).unwrap_or("");
        if int.is_empty() && frac.is_empty() {
            return None;
        }

        let sign = if sign == "-" { "-" } else { "" };
        let int = if int.is_empty() { "0" } else { int.as_str() };
        Decimal::from_str(&format!("{sign}{int}{frac}")).ok()
    }
}

/// Read transactions from any CSV source
pub fn read_ledger_csv<R: Read>(reader: R, options: LoadOptions) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let amounts = AmountParser::new()?;
    let mut txns = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // Skip fully blank rows
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let parsed = record
            .deserialize::<RawRecord>(Some(&headers))
            .map_err(LoadError::from)
            .and_then(|raw| to_transaction(&raw, line, &amounts));
        match parsed {
            Ok(txn) => txns.push(txn),
            Err(err) if options.skip_invalid => {
                warn!("skipping row: {err}");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    debug!("parsed {} ledger rows ({} skipped)", txns.len(), skipped);
    Ok(txns)
}

/// Read transactions from a CSV file
pub fn parse_ledger_csv(path: impl AsRef<Path>, options: LoadOptions) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_ledger_csv(file, options)
}

/// Load and classify a CSV file into a ledger snapshot
pub fn load_ledger(path: impl AsRef<Path>, rules: RuleTable, options: LoadOptions) -> Result<Ledger> {
    let txns = parse_ledger_csv(path, options)?;
    Ok(Ledger::classify(txns, rules))
}

fn to_transaction(raw: &RawRecord, line: u64, amounts: &AmountParser) -> Result<Transaction> {
    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| LoadError::InvalidTimestamp {
        line,
        value: raw.timestamp.clone(),
    })?;
    let amount = amounts
        .parse(&raw.amount)
        .filter(|a| a.abs() <= Decimal::from(MAX_ABS_AMOUNT))
        .ok_or_else(|| LoadError::InvalidAmount {
            line,
            value: raw.amount.clone(),
        })?;
    Ok(Transaction::new(timestamp, raw.description.trim(), amount))
}
