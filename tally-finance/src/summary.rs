//! Summary report: the aggregate views computed from a classified ledger.
//!
//! Every view is an independent pass over the same ledger. Sums are kept at
//! full decimal precision; `SummaryReport::rounded` applies the 2 dp display
//! rounding. Money serializes as plain numbers.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::time::{month_key, weekday_name, WEEK};
use tally_core::{Category, ClassifiedTransaction, Ledger};
use tracing::debug;

/// Default length of the top-expenses list
pub const TOP_EXPENSES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// "YYYY-MM"
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekdayAverage {
    pub day: String,
    /// Mean signed amount, so zero or negative
    #[serde(with = "rust_decimal::serde::float")]
    pub average: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopExpense {
    /// Absolute value of the expense
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

/// Every view of one ledger snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryReport {
    pub totals: Totals,
    /// Chronological; only months that have transactions
    pub monthly: Vec<MonthlyTotal>,
    /// Expense totals per category. Order carries no meaning.
    pub categories: Vec<CategoryTotal>,
    /// Always seven entries, Monday first
    pub weekdays: Vec<WeekdayAverage>,
    /// Largest expense first
    pub top_expenses: Vec<TopExpense>,
}

impl SummaryReport {
    /// Copy with every money value rounded to cents (midpoint to even)
    pub fn rounded(&self) -> SummaryReport {
        let r = |d: Decimal| d.round_dp(2);
        SummaryReport {
            totals: Totals {
                total_income: r(self.totals.total_income),
                total_expenses: r(self.totals.total_expenses),
                net: r(self.totals.net),
                transaction_count: self.totals.transaction_count,
            },
            monthly: self
                .monthly
                .iter()
                .map(|m| MonthlyTotal {
                    month: m.month.clone(),
                    amount: r(m.amount),
                })
                .collect(),
            categories: self
                .categories
                .iter()
                .map(|c| CategoryTotal {
                    amount: r(c.amount),
                    ..c.clone()
                })
                .collect(),
            weekdays: self
                .weekdays
                .iter()
                .map(|w| WeekdayAverage {
                    day: w.day.clone(),
                    average: r(w.average),
                })
                .collect(),
            top_expenses: self
                .top_expenses
                .iter()
                .map(|t| TopExpense {
                    amount: r(t.amount),
                    ..t.clone()
                })
                .collect(),
        }
    }
}

/// Computes summary reports
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    top: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self { top: TOP_EXPENSES }
    }
}

impl Aggregator {
    /// Aggregator returning `top` entries in the top-expenses view
    pub fn with_top(top: usize) -> Self {
        Self { top }
    }

    pub fn summarize(&self, ledger: &Ledger) -> SummaryReport {
        let report = SummaryReport {
            totals: totals(ledger),
            monthly: monthly_series(ledger),
            categories: category_totals(ledger),
            weekdays: weekday_averages(ledger),
            top_expenses: top_expenses(ledger, self.top),
        };
        debug!(
            "summarized {} transactions over {} months",
            report.totals.transaction_count,
            report.monthly.len()
        );
        report
    }
}

/// Summarize with the default top-10 list
pub fn summarize(ledger: &Ledger) -> SummaryReport {
    Aggregator::default().summarize(ledger)
}

/// Income, expense and net totals. Zero amounts only count toward `transaction_count`.
pub fn totals(ledger: &Ledger) -> Totals {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for entry in ledger {
        if entry.is_income() {
            income += entry.amount;
        } else if entry.is_expense() {
            expenses += entry.abs_amount();
        }
    }
    Totals {
        total_income: income,
        total_expenses: expenses,
        net: income - expenses,
        transaction_count: ledger.len(),
    }
}

/// Signed total per calendar month, oldest first. Months with no
/// transactions are left out rather than zero-filled.
pub fn monthly_series(ledger: &Ledger) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for entry in ledger {
        *months.entry(month_key(&entry.timestamp)).or_insert(Decimal::ZERO) += entry.amount;
    }
    months
        .into_iter()
        .map(|(month, amount)| MonthlyTotal { month, amount })
        .collect()
}

/// Absolute expense total per category, Income excluded
pub fn category_totals(ledger: &Ledger) -> Vec<CategoryTotal> {
    let mut sums: BTreeMap<Category, Decimal> = BTreeMap::new();
    for entry in expenses(ledger).filter(|e| e.category != Category::Income) {
        *sums.entry(entry.category).or_insert(Decimal::ZERO) += entry.abs_amount();
    }
    sums.into_iter()
        .map(|(category, amount)| CategoryTotal {
            category,
            amount,
            color: ledger.rules().color(category).to_string(),
        })
        .collect()
}

/// Mean signed expense per weekday, Monday to Sunday, zero where a weekday
/// has no expenses. A plain mean over the expense rows, not per calendar day.
pub fn weekday_averages(ledger: &Ledger) -> Vec<WeekdayAverage> {
    let mut sums = [Decimal::ZERO; 7];
    let mut counts = [0u32; 7];
    for entry in expenses(ledger) {
        let i = entry.timestamp.weekday().num_days_from_monday() as usize;
        sums[i] += entry.amount;
        counts[i] += 1;
    }
    WEEK.iter()
        .enumerate()
        .map(|(i, day)| WeekdayAverage {
            day: weekday_name(*day).to_string(),
            average: if counts[i] == 0 {
                Decimal::ZERO
            } else {
                sums[i] / Decimal::from(counts[i])
            },
        })
        .collect()
}

/// The `n` largest expenses, largest first; ties keep ledger order
pub fn top_expenses(ledger: &Ledger, n: usize) -> Vec<TopExpense> {
    let mut ranked: Vec<&ClassifiedTransaction> = expenses(ledger).collect();
    ranked.sort_by(|a, b| a.amount.cmp(&b.amount));
    ranked
        .into_iter()
        .take(n)
        .map(|e| TopExpense {
            amount: e.abs_amount(),
            description: e.description.clone(),
            date: e.date(),
        })
        .collect()
}

fn expenses(ledger: &Ledger) -> impl Iterator<Item = &ClassifiedTransaction> {
    ledger.iter().filter(|e| e.is_expense())
}
