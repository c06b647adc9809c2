//! Report label translations.
//!
//! The engine never reads these; they ride along so the presentation layer can
//! render the same report in different languages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::finance::Category;

/// Locale used when a requested code is unknown
pub const DEFAULT_LOCALE: &str = "en";

/// Labels for one locale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Labels {
    pub income: String,
    pub expenses: String,
    pub net: String,
    pub monthly_cash_flow: String,
    pub expenses_by_category: String,
    pub daily_average: String,
    pub top_expenses: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub transactions: String,
    /// Category display names; missing entries use the category's own name
    #[serde(default)]
    pub categories: BTreeMap<Category, String>,
}

impl Labels {
    pub fn category<'a>(&'a self, category: Category) -> &'a str {
        self.categories
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.name())
    }

    fn english() -> Self {
        Self {
            income: "💵 Income".into(),
            expenses: "💸 Expenses".into(),
            net: "📊 Net".into(),
            monthly_cash_flow: "📈 Monthly Cash Flow".into(),
            expenses_by_category: "🗂️ Expenses".into(),
            daily_average: "📅 Daily Avg".into(),
            top_expenses: "💸 Top Expenses".into(),
            date: "Date".into(),
            description: "Description".into(),
            amount: "Amount".into(),
            transactions: "transactions".into(),
            categories: names(&[
                (Category::Shopping, "Shopping"),
                (Category::FoodAndDining, "Food & Dining"),
                (Category::Transportation, "Transport"),
                (Category::Entertainment, "Entertainment"),
                (Category::BillsAndUtilities, "Bills"),
                (Category::Healthcare, "Healthcare"),
                (Category::Travel, "Travel"),
                (Category::Other, "Other"),
            ]),
        }
    }

    fn spanish() -> Self {
        Self {
            income: "💵 Ingresos".into(),
            expenses: "💸 Gastos".into(),
            net: "📊 Neto".into(),
            monthly_cash_flow: "📈 Flujo de Caja Mensual".into(),
            expenses_by_category: "🗂️ Gastos".into(),
            daily_average: "📅 Promedio Diario".into(),
            top_expenses: "💸 Principales Gastos".into(),
            date: "Fecha".into(),
            description: "Descripción".into(),
            amount: "Monto".into(),
            transactions: "transacciones".into(),
            categories: names(&[
                (Category::Shopping, "Compras"),
                (Category::FoodAndDining, "Comida"),
                (Category::Transportation, "Transporte"),
                (Category::Entertainment, "Entretenim."),
                (Category::BillsAndUtilities, "Facturas"),
                (Category::Healthcare, "Salud"),
                (Category::Travel, "Viajes"),
                (Category::Other, "Otros"),
            ]),
        }
    }
}

fn names(pairs: &[(Category, &str)]) -> BTreeMap<Category, String> {
    pairs.iter().map(|(c, s)| (*c, s.to_string())).collect()
}

/// Locale code → labels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LocaleTable {
    locales: BTreeMap<String, Labels>,
}

impl LocaleTable {
    /// Labels for `code`, falling back to English
    pub fn get(&self, code: &str) -> &Labels {
        self.locales
            .get(code)
            .or_else(|| self.locales.get(DEFAULT_LOCALE))
            .unwrap_or_else(|| fallback())
    }

    /// Add or replace a locale
    pub fn insert(&mut self, code: impl Into<String>, labels: Labels) {
        self.locales.insert(code.into(), labels);
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        let mut locales = BTreeMap::new();
        locales.insert("en".to_string(), Labels::english());
        locales.insert("es".to_string(), Labels::spanish());
        Self { locales }
    }
}

fn fallback() -> &'static Labels {
    static ENGLISH: std::sync::OnceLock<Labels> = std::sync::OnceLock::new();
    ENGLISH.get_or_init(Labels::english)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_locales() {
        let table = LocaleTable::default();
        assert_eq!(table.codes().collect::<Vec<_>>(), vec!["en", "es"]);
        assert_eq!(table.get("es").net, "📊 Neto");
        assert_eq!(table.get("es").category(Category::Travel), "Viajes");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let table = LocaleTable::default();
        assert_eq!(table.get("fr").income, "💵 Income");
    }

    #[test]
    fn test_missing_category_name_uses_display_name() {
        let table = LocaleTable::default();
        // Income has no translation entry
        assert_eq!(table.get("es").category(Category::Income), "Income");
        assert_eq!(table.get("en").category(Category::Transportation), "Transport");
    }

    #[test]
    fn test_insert_override() {
        let mut table = LocaleTable::default();
        let mut labels = table.get("en").clone();
        labels.net = "Net".to_string();
        table.insert("en", labels);
        assert_eq!(table.get("en").net, "Net");
        assert_eq!(table.get("fr").net, "Net");
    }
}
