//! Finance record types: raw transactions and spending categories

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single ledger entry as loaded from the source data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// When the transaction happened (naive, treated as UTC)
    pub timestamp: NaiveDateTime,
    /// Free-text description used for classification
    pub description: String,
    /// Positive = income, negative = expense
    pub amount: Decimal,
}

impl Transaction {
    /// Create a new Transaction
    pub fn new(timestamp: NaiveDateTime, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            timestamp,
            description: description.into(),
            amount,
        }
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// Calendar date of the transaction
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Spending categories assigned by keyword rules.
///
/// Variant order is the default classification order, with `Other` last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Income")]
    Income,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Other")]
    Other,
}

/// Color used for anything the rule table has no color for
pub const FALLBACK_COLOR: &str = "#71767b";

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 9] = [
        Category::Income,
        Category::Shopping,
        Category::FoodAndDining,
        Category::Transportation,
        Category::Entertainment,
        Category::BillsAndUtilities,
        Category::Healthcare,
        Category::Travel,
        Category::Other,
    ];

    /// Display name, also the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::Shopping => "Shopping",
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::BillsAndUtilities => "Bills & Utilities",
            Category::Healthcare => "Healthcare",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }

    /// Default display color
    pub fn default_color(&self) -> &'static str {
        match self {
            Category::Income => "#00ba7c",
            Category::Shopping => "#f4212e",
            Category::FoodAndDining => "#ff7a1a",
            Category::Transportation => "#ffd400",
            Category::Entertainment => "#00ba7c",
            Category::BillsAndUtilities => "#1d9bf0",
            Category::Healthcare => "#9d36d6",
            Category::Travel => "#e0245e",
            Category::Other => FALLBACK_COLOR,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    /// Parse a display name, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| crate::Error::UnknownCategory(s.to_string()))
    }
}
