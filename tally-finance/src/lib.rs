//! tally-finance: summary views over a classified ledger

pub mod summary;

pub use summary::{
    summarize, Aggregator, CategoryTotal, MonthlyTotal, SummaryReport, TopExpense, Totals,
    WeekdayAverage, TOP_EXPENSES,
};
