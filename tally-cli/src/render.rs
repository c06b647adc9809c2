//! Plain-text rendering of a summary report.

use rust_decimal::Decimal;
use std::fmt;

use tally_core::{Labels, RuleTable};
use tally_finance::SummaryReport;

/// `$1,234.50` / `-$22.00`
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Text form of a summary report in one locale
pub struct ReportView<'a> {
    report: &'a SummaryReport,
    labels: &'a Labels,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a SummaryReport, labels: &'a Labels) -> Self {
        Self { report, labels }
    }
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (report, labels) = (self.report, self.labels);
        let t = &report.totals;

        writeln!(f, "{:<24} {:>14}", labels.income, money(t.total_income))?;
        writeln!(f, "{:<24} {:>14}", labels.expenses, money(t.total_expenses))?;
        writeln!(f, "{:<24} {:>14}", labels.net, money(t.net))?;
        writeln!(f, "{} {}", t.transaction_count, labels.transactions)?;

        writeln!(f, "\n{}", labels.monthly_cash_flow)?;
        for m in &report.monthly {
            writeln!(f, "  {:<10} {:>14}", m.month, money(m.amount))?;
        }

        writeln!(f, "\n{}", labels.expenses_by_category)?;
        let mut categories: Vec<_> = report.categories.iter().collect();
        categories.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
        for c in categories {
            writeln!(
                f,
                "  {:<20} {:>14}  {}",
                labels.category(c.category),
                money(c.amount),
                c.color
            )?;
        }

        writeln!(f, "\n{}", labels.daily_average)?;
        for w in &report.weekdays {
            writeln!(f, "  {:<10} {:>14}", w.day, money(w.average))?;
        }

        writeln!(f, "\n{}", labels.top_expenses)?;
        writeln!(
            f,
            "  {:<10}  {:<30} {:>14}",
            labels.date, labels.description, labels.amount
        )?;
        for e in &report.top_expenses {
            writeln!(
                f,
                "  {:<10}  {:<30} {:>14}",
                e.date.format("%Y-%m-%d"),
                e.description,
                money(e.amount)
            )?;
        }
        Ok(())
    }
}

/// One line per category: localized name, color, keywords in match order
pub struct CategoryList<'a> {
    rules: &'a RuleTable,
    labels: &'a Labels,
}

impl<'a> CategoryList<'a> {
    pub fn new(rules: &'a RuleTable, labels: &'a Labels) -> Self {
        Self { rules, labels }
    }
}

impl fmt::Display for CategoryList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in self.rules.categories() {
            let keywords = self
                .rules
                .rules()
                .iter()
                .find(|r| r.category == category)
                .map(|r| r.keywords.join(", "))
                .unwrap_or_default();
            writeln!(
                f,
                "{:<20} {}  {}",
                self.labels.category(category),
                self.rules.color(category),
                keywords
            )?;
        }
        Ok(())
    }
}
