//! tally-core: transaction model, keyword classifier and ledger snapshot

pub mod categorizer;
pub mod error;
pub mod finance;
pub mod ledger;
pub mod locale;
pub mod time;

pub use categorizer::{classify, default_rules, CategoryRule, RuleTable};
pub use error::{Error, Result};
pub use finance::{Category, Transaction, FALLBACK_COLOR};
pub use ledger::{ClassifiedTransaction, Ledger};
pub use locale::{Labels, LocaleTable, DEFAULT_LOCALE};
