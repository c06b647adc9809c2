use serde::{Deserialize, Serialize};

/// One CSV row before parsing. Columns other than these three are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: String,
    pub description: String,
    pub amount: String,
}

/// How the loader treats rows it cannot parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop malformed rows with a warning instead of failing the load
    pub skip_invalid: bool,
}
