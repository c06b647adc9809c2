//! Keyword rule table and the description classifier.
//!
//! Rules are plain data: an ordered list of categories, each with an ordered
//! keyword list. Classification walks the table front to back and returns the
//! first category with a keyword that appears in the description
//! (case-insensitive). Order is the tie-break, so a description that mentions
//! keywords from two categories resolves to whichever is listed first.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::finance::Category;

/// One category's keywords and display color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    #[serde(rename = "name")]
    pub category: Category,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str], color: &str) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: Some(color.to_string()),
        }
    }
}

/// Ordered, validated rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<CategoryRule>,
    /// Lowercased keywords per rule, same order as `rules`
    matchers: Vec<(Category, Vec<String>)>,
}

impl RuleTable {
    /// Build a table from custom rules.
    ///
    /// Rejects duplicate categories, blank keywords and an `Other` rule with
    /// keywords (`Other` is the fallback and never matched directly).
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.category) {
                return Err(Error::InvalidRuleTable(format!(
                    "category '{}' listed more than once",
                    rule.category
                )));
            }
            if rule.category == Category::Other && !rule.keywords.is_empty() {
                return Err(Error::InvalidRuleTable(
                    "'Other' is the fallback and cannot have keywords".to_string(),
                ));
            }
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(Error::InvalidRuleTable(format!(
                    "category '{}' has a blank keyword",
                    rule.category
                )));
            }
        }

        debug!("rule table loaded with {} categories", rules.len());
        Ok(Self::from_rules(rules))
    }

    fn from_rules(rules: Vec<CategoryRule>) -> Self {
        let matchers = rules
            .iter()
            .filter(|r| r.category != Category::Other)
            .map(|r| {
                let lowered = r.keywords.iter().map(|k| k.to_lowercase()).collect();
                (r.category, lowered)
            })
            .collect();
        Self { rules, matchers }
    }

    /// Classify a description. Never fails: anything unmatched is `Other`.
    pub fn classify(&self, description: &str) -> Category {
        let desc = description.to_lowercase();
        for (category, keywords) in &self.matchers {
            if keywords.iter().any(|k| desc.contains(k.as_str())) {
                return *category;
            }
        }
        Category::Other
    }

    /// Display color for a category; defaults when the table sets none
    pub fn color(&self, category: Category) -> &str {
        self.rules
            .iter()
            .find(|r| r.category == category)
            .and_then(|r| r.color.as_deref())
            .unwrap_or_else(|| category.default_color())
    }

    /// All categories in classification order, with `Other` last
    pub fn categories(&self) -> Vec<Category> {
        self.matchers
            .iter()
            .map(|(c, _)| *c)
            .chain(std::iter::once(Category::Other))
            .collect()
    }

    /// The rules as configured
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        let rules = vec![
            CategoryRule::new(
                Category::Income,
                &["Salary", "Freelance", "Dividend", "Interest", "Stock", "Rental", "Consulting", "Bonus"],
                "#00ba7c",
            ),
            CategoryRule::new(
                Category::Shopping,
                &[
                    "Amazon",
                    "Electronics",
                    "Grocery Store",
                    "Clothing",
                    "Home Improvement",
                    "Books",
                    "Pet",
                    "Health & Beauty",
                ],
                "#f4212e",
            ),
            CategoryRule::new(
                Category::FoodAndDining,
                &["Restaurant", "Coffee", "Fast Food", "Groceries", "Food Delivery", "Takeout"],
                "#ff7a1a",
            ),
            CategoryRule::new(
                Category::Transportation,
                &[
                    "Gas Station",
                    "Uber",
                    "Lyft",
                    "Car Insurance",
                    "Car Maintenance",
                    "Parking",
                    "Toll",
                    "Public Transit",
                ],
                "#ffd400",
            ),
            CategoryRule::new(
                Category::Entertainment,
                &["Netflix", "Spotify", "Movie", "Concert", "Gaming", "Sports", "Hobby", "Streaming"],
                "#00ba7c",
            ),
            CategoryRule::new(
                Category::BillsAndUtilities,
                &[
                    "Electric",
                    "Water",
                    "Internet",
                    "Phone",
                    "Insurance Premium",
                    "Rent",
                    "Mortgage",
                    "Property Tax",
                ],
                "#1d9bf0",
            ),
            CategoryRule::new(
                Category::Healthcare,
                &["Doctor", "Pharmacy", "Dental", "Vision", "Medical Test", "Therapy", "Gym"],
                "#9d36d6",
            ),
            CategoryRule::new(
                Category::Travel,
                &["Flight", "Hotel", "Airbnb", "Car Rental", "Travel Insurance", "Tour"],
                "#e0245e",
            ),
        ];

        Self::from_rules(rules)
    }
}

/// Shared default rule table, built on first use
pub fn default_rules() -> &'static RuleTable {
    static DEFAULT: OnceLock<RuleTable> = OnceLock::new();
    DEFAULT.get_or_init(RuleTable::default)
}

/// Classify with the default rule table
pub fn classify(description: &str) -> Category {
    default_rules().classify(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_built_once() {
        assert!(std::ptr::eq(default_rules(), default_rules()));
        assert_eq!(default_rules(), &RuleTable::default());
    }

    #[test]
    fn test_classify_income() {
        assert_eq!(classify("Salary - Monthly"), Category::Income);
        assert_eq!(classify("Dividend Income"), Category::Income);
    }

    #[test]
    fn test_classify_ignores_case() {
        assert_eq!(classify("AMAZON order"), Category::Shopping);
        assert_eq!(classify("netflix subscription"), Category::Entertainment);
        assert_eq!(classify("uBeR rIdE"), Category::Transportation);
    }

    #[test]
    fn test_classify_each_category() {
        assert_eq!(classify("Coffee Shop"), Category::FoodAndDining);
        assert_eq!(classify("Electric Bill"), Category::BillsAndUtilities);
        assert_eq!(classify("Pharmacy - Prescription"), Category::Healthcare);
        assert_eq!(classify("Flight Booking"), Category::Travel);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(classify("Souvenirs"), Category::Other);
        assert_eq!(classify(""), Category::Other);
        assert_eq!(classify("   "), Category::Other);
    }

    #[test]
    fn test_earlier_category_wins() {
        // Shopping is checked before Travel
        assert_eq!(classify("Grocery Store Flight"), Category::Shopping);
        // "Restaurant" is a Food & Dining keyword, checked before Travel
        assert_eq!(classify("Restaurant - Travel"), Category::FoodAndDining);
        // "Car Rental" contains the Income keyword "Rental"
        assert_eq!(classify("Car Rental"), Category::Income);
    }

    #[test]
    fn test_custom_order_changes_tie_break() {
        let table = RuleTable::new(vec![
            CategoryRule::new(Category::Travel, &["Flight"], "#e0245e"),
            CategoryRule::new(Category::Shopping, &["Grocery Store"], "#f4212e"),
        ])
        .unwrap();
        assert_eq!(table.classify("Grocery Store Flight"), Category::Travel);
        assert_eq!(table.classify("Amazon"), Category::Other);
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let err = RuleTable::new(vec![
            CategoryRule::new(Category::Travel, &["Flight"], "#e0245e"),
            CategoryRule::new(Category::Travel, &["Hotel"], "#e0245e"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRuleTable(_)));
    }

    #[test]
    fn test_rejects_other_keywords_and_blanks() {
        assert!(RuleTable::new(vec![CategoryRule::new(Category::Other, &["misc"], "#000")]).is_err());
        assert!(RuleTable::new(vec![CategoryRule::new(Category::Travel, &[" "], "#000")]).is_err());
        // Other without keywords only sets its color
        let table =
            RuleTable::new(vec![CategoryRule::new(Category::Other, &[], "#123456")]).unwrap();
        assert_eq!(table.color(Category::Other), "#123456");
        assert_eq!(table.categories(), vec![Category::Other]);
    }

    #[test]
    fn test_colors_and_category_listing() {
        let table = RuleTable::default();
        assert_eq!(table.color(Category::FoodAndDining), "#ff7a1a");
        assert_eq!(table.color(Category::Other), "#71767b");
        assert_eq!(table.categories(), Category::ALL.to_vec());
    }

    #[test]
    fn test_missing_color_falls_back_to_default() {
        let table = RuleTable::new(vec![CategoryRule {
            category: Category::Healthcare,
            keywords: vec!["Gym".to_string()],
            color: None,
        }])
        .unwrap();
        assert_eq!(table.color(Category::Healthcare), "#9d36d6");
        assert_eq!(table.color(Category::Travel), "#e0245e");
    }
}
