use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::path::PathBuf;
use tally_core::{Category, Ledger, RuleTable, Transaction};
use tally_finance::{summarize, TOP_EXPENSES};
use tally_ingest::{load_ledger, read_ledger_csv, LoadOptions, MAX_ABS_AMOUNT};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures/finance_data.csv")
}

fn fixture_ledger() -> Ledger {
    load_ledger(fixture_path(), RuleTable::default(), LoadOptions::default()).unwrap()
}

/// The four-row ledger from the dashboard walkthrough, loaded through the CSV path.
#[test]
fn test_walkthrough_ledger_end_to_end() {
    let csv = "timestamp,description,amount\n\
               2024-01-05 09:00:00,Salary - Monthly,5000.00\n\
               2024-01-06 08:15:00,Coffee Shop,-4.50\n\
               2024-01-06 20:00:00,Netflix Subscription,-15.99\n\
               2024-02-01 18:30:00,Uber Ride,-22.00\n";
    let txns = read_ledger_csv(csv.as_bytes(), LoadOptions::default()).unwrap();
    let report = summarize(&Ledger::classify(txns, RuleTable::default())).rounded();

    assert_eq!(report.totals.total_income, dec!(5000.00));
    assert_eq!(report.totals.total_expenses, dec!(42.49));
    assert_eq!(report.totals.net, dec!(4957.51));
    assert_eq!(report.totals.transaction_count, 4);

    let monthly: Vec<_> = report
        .monthly
        .iter()
        .map(|m| (m.month.as_str(), m.amount))
        .collect();
    assert_eq!(monthly, vec![("2024-01", dec!(4979.51)), ("2024-02", dec!(-22.00))]);

    let categories: HashMap<Category, Decimal> = report
        .categories
        .iter()
        .map(|c| (c.category, c.amount))
        .collect();
    let expected: HashMap<Category, Decimal> = [
        (Category::FoodAndDining, dec!(4.50)),
        (Category::Entertainment, dec!(15.99)),
        (Category::Transportation, dec!(22.00)),
    ]
    .into_iter()
    .collect();
    assert_eq!(categories, expected);

    let top: Vec<_> = report
        .top_expenses
        .iter()
        .map(|t| (t.description.as_str(), t.amount))
        .collect();
    assert_eq!(
        top,
        vec![
            ("Uber Ride", dec!(22.00)),
            ("Netflix Subscription", dec!(15.99)),
            ("Coffee Shop", dec!(4.50)),
        ]
    );
    assert_eq!(report.top_expenses[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
}

#[test]
fn test_totals_balance_exactly() {
    let report = summarize(&fixture_ledger());
    let t = &report.totals;
    assert_eq!(t.total_income - t.total_expenses, t.net);

    let monthly_sum: Decimal = report.monthly.iter().map(|m| m.amount).sum();
    assert_eq!(monthly_sum, t.net);

    let category_sum: Decimal = report.categories.iter().map(|c| c.amount).sum();
    assert_eq!(category_sum, t.total_expenses);
}

#[test]
fn test_fixture_views_shape() {
    let ledger = fixture_ledger();
    let report = summarize(&ledger);

    assert_eq!(report.totals.transaction_count, ledger.len());
    assert_eq!(report.weekdays.len(), 7);
    assert!(report.weekdays.iter().all(|w| w.average <= Decimal::ZERO));

    let expense_count = ledger.iter().filter(|e| e.is_expense()).count();
    assert_eq!(report.top_expenses.len(), expense_count.min(TOP_EXPENSES));
    for w in report.top_expenses.windows(2) {
        assert!(w[0].amount >= w[1].amount, "top expenses not sorted");
    }

    for w in report.monthly.windows(2) {
        assert!(w[0].month < w[1].month, "months not chronological");
    }

    assert!(report.categories.iter().all(|c| c.category != Category::Income));
    let mut seen: Vec<_> = report.categories.iter().map(|c| c.category).collect();
    seen.dedup();
    assert_eq!(seen.len(), report.categories.len());
}

#[test]
fn test_report_is_idempotent() {
    let ledger = fixture_ledger();
    let first = summarize(&ledger);
    let second = summarize(&ledger);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.rounded()).unwrap(),
        serde_json::to_string(&second.rounded()).unwrap()
    );
}

/// Sub-cent amounts must not drift: sums stay exact and only output is rounded.
#[test]
fn test_sub_cent_amounts_stay_exact() {
    let at = |d: u32| {
        NaiveDate::from_ymd_opt(2024, 4, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    };
    let txns: Vec<_> = (1..=30)
        .map(|d| Transaction::new(at(d), "Coffee", dec!(-0.333)))
        .chain(std::iter::once(Transaction::new(at(15), "Bonus", dec!(0.001))))
        .collect();
    let report = summarize(&Ledger::classify(txns, RuleTable::default()));

    assert_eq!(report.totals.total_expenses, dec!(9.990));
    assert_eq!(report.totals.net, dec!(-9.989));
    assert_eq!(report.monthly[0].amount, report.totals.net);
    assert_eq!(report.rounded().totals.net, dec!(-9.99));
}

/// Oversized rows never reach the aggregator; the largest accepted amounts sum without overflow.
#[test]
fn test_extreme_amounts_summarize() {
    let huge = "timestamp,description,amount\n\
                2024-01-06 08:00:00,Wire Transfer,50000000000000000000000000000\n\
                2024-01-07 08:00:00,Wire Transfer,50000000000000000000000000000\n";
    let txns = read_ledger_csv(huge.as_bytes(), LoadOptions { skip_invalid: true }).unwrap();
    let report = summarize(&Ledger::classify(txns, RuleTable::default()));
    assert_eq!(report.totals.transaction_count, 0);

    let mut csv = String::from("timestamp,description,amount\n");
    for day in 1..=28 {
        csv.push_str(&format!("2024-02-{day:02} 09:00:00,Bonus,{MAX_ABS_AMOUNT}\n"));
        csv.push_str(&format!("2024-02-{day:02} 10:00:00,Hotel,-{MAX_ABS_AMOUNT}\n"));
    }
    let txns = read_ledger_csv(csv.as_bytes(), LoadOptions::default()).unwrap();
    let report = summarize(&Ledger::classify(txns, RuleTable::default()));

    let bound = Decimal::from(MAX_ABS_AMOUNT);
    assert_eq!(report.totals.total_income, bound * Decimal::from(28));
    assert_eq!(report.totals.total_expenses, bound * Decimal::from(28));
    assert_eq!(report.totals.net, Decimal::ZERO);
    assert_eq!(report.top_expenses[0].amount, bound);
}
