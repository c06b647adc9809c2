pub mod ledger_csv;

pub use ledger_csv::{
    load_ledger, parse_ledger_csv, parse_timestamp, read_ledger_csv, AmountParser,
    MAX_ABS_AMOUNT,
};
