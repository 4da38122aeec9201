use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw bank transaction as seen by the classification pipeline.
///
/// Constructed fresh per classification call and never mutated. The sign of
/// `amount` carries direction: negative is an expense, positive is income.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionContext {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub description: String,
    /// Bank-provided category hierarchy, most specific first.
    #[serde(default)]
    pub category: Vec<String>,
    /// Raw aggregator category hierarchy, used when `category` is empty.
    #[serde(default)]
    pub plaid_category: Vec<String>,
    pub date: NaiveDate,
    pub is_business: bool,
    pub user_id: String,
}

impl TransactionContext {
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Unsigned transaction amount, the value posted to both entry lines.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Categories to classify against: the normalized hierarchy when present,
    /// otherwise the raw aggregator hierarchy.
    pub fn effective_categories(&self) -> &[String] {
        if self.category.is_empty() {
            &self.plaid_category
        } else {
            &self.category
        }
    }
}
