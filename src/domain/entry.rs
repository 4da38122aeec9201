use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::EntrySide;

/// A proposed double-entry posting for one transaction.
///
/// Suggestions are ephemeral: they exist for human review and are never
/// persisted. `confidence` is a [0, 1] certainty score that drives UI review
/// prompts; `explanation` tells the user why this pairing was chosen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntrySuggestion {
    pub debit_account_id: Uuid,
    pub credit_account_id: Uuid,
    /// Always non-negative; direction is encoded by the account pairing.
    pub amount: f64,
    pub memo: String,
    pub confidence: f64,
    pub explanation: String,
}

/// An accepted suggestion ready to be materialized into entry lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProposedEntry {
    pub debit_account_id: Uuid,
    pub credit_account_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub memo: String,
}

impl ProposedEntry {
    /// Builds a proposed entry from an accepted suggestion.
    pub fn from_suggestion(suggestion: &EntrySuggestion, currency: impl Into<String>) -> Self {
        Self {
            debit_account_id: suggestion.debit_account_id,
            credit_account_id: suggestion.credit_account_id,
            amount: suggestion.amount,
            currency: currency.into(),
            memo: suggestion.memo.clone(),
        }
    }
}

/// The atomic unit of ledger mutation: a dated, balanced group of lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub memo: String,
}

impl Entry {
    pub fn new(date: NaiveDate, memo: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            memo: memo.into(),
        }
    }
}

/// One posting of an entry. Immutable once written; corrections are made by
/// appending offsetting entries, never by updating lines in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryLine {
    pub id: String,
    pub entry_id: Uuid,
    pub account_id: Uuid,
    pub side: EntrySide,
    /// Always non-negative; the side carries the sign.
    pub amount: f64,
    pub currency: String,
}
