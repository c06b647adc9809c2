//! The classified, time-ordered ledger snapshot that reports are computed from.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categorizer::RuleTable;
use crate::finance::{Category, Transaction};

/// A transaction paired with the category its description maps to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifiedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Category,
}

impl ClassifiedTransaction {
    pub fn classify(transaction: Transaction, rules: &RuleTable) -> Self {
        let category = rules.classify(&transaction.description);
        Self {
            transaction,
            category,
        }
    }
}

impl std::ops::Deref for ClassifiedTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Transaction {
        &self.transaction
    }
}

/// Read-only snapshot of every classified transaction, sorted by timestamp.
///
/// Rebuilt wholesale on reload; never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<ClassifiedTransaction>,
    rules: RuleTable,
}

impl Ledger {
    /// Classify every transaction and order them by timestamp.
    /// Entries with equal timestamps keep their input order.
    pub fn classify(transactions: Vec<Transaction>, rules: RuleTable) -> Self {
        let mut entries: Vec<ClassifiedTransaction> = transactions
            .into_iter()
            .map(|t| ClassifiedTransaction::classify(t, &rules))
            .collect();
        entries.sort_by_key(|e| e.timestamp);

        debug!("classified {} transactions", entries.len());
        Self { entries, rules }
    }

    /// A ledger with no transactions
    pub fn empty(rules: RuleTable) -> Self {
        Self {
            entries: Vec::new(),
            rules,
        }
    }

    pub fn entries(&self) -> &[ClassifiedTransaction] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassifiedTransaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rule table these entries were classified with
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a ClassifiedTransaction;
    type IntoIter = std::slice::Iter<'a, ClassifiedTransaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
