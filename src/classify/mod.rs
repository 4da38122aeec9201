//! Layered transaction classification.
//!
//! Strategies run in strict priority order and the first success wins:
//! explicit user rules, then built-in heuristics, then a generic fallback that
//! always produces a suggestion or fails loudly. No stage may override an
//! earlier stage's success.

pub mod enhance;
pub mod generic;
pub mod rule_match;
pub mod standard;

pub use enhance::{
    calculate_confidence, enhance_suggestion, ConfidenceFactors, HistoricalMatch,
    SuggestionContext, UserPreferences,
};
pub use generic::create_generic_entry;
pub use rule_match::RuleMatcher;
pub use standard::{find_account_by_category, StandardClassifier};

use crate::domain::account::Account;
use crate::domain::entry::EntrySuggestion;
use crate::domain::rule::CategorizationRule;
use crate::domain::transaction::TransactionContext;
use crate::errors::EngineError;

/// A single classification strategy.
///
/// `None` means "no opinion" and hands the transaction to the next strategy;
/// it is an expected outcome, not a failure.
pub trait Classify {
    fn try_classify(
        &self,
        transaction: &TransactionContext,
        accounts: &[Account],
    ) -> Option<EntrySuggestion>;
}

/// Orchestrates the classification strategies for a chart of accounts.
///
/// The strategy order is a first-class list: user intent beats learned
/// heuristics beats safe defaults. Build one engine per rule set and reuse it
/// across transactions; rule patterns are compiled once at construction.
pub struct SuggestionEngine {
    strategies: Vec<Box<dyn Classify>>,
}

impl SuggestionEngine {
    pub fn new(user_rules: Vec<CategorizationRule>) -> Self {
        let mut strategies: Vec<Box<dyn Classify>> = Vec::new();
        if !user_rules.is_empty() {
            strategies.push(Box::new(RuleMatcher::new(user_rules)));
        }
        strategies.push(Box::new(StandardClassifier));
        Self { strategies }
    }

    /// Produces exactly one suggestion for the transaction.
    ///
    /// Errors only when the chart of accounts is structurally incomplete
    /// (see [`EngineError::MissingAccount`]).
    pub fn suggest(
        &self,
        transaction: &TransactionContext,
        accounts: &[Account],
    ) -> Result<EntrySuggestion, EngineError> {
        for strategy in &self.strategies {
            if let Some(suggestion) = strategy.try_classify(transaction, accounts) {
                return Ok(suggestion);
            }
        }
        tracing::debug!(
            description = %transaction.description,
            "no strategy matched, using generic fallback"
        );
        create_generic_entry(transaction, accounts)
    }
}

/// One-shot convenience wrapper around [`SuggestionEngine`].
pub fn suggest_entry(
    transaction: &TransactionContext,
    accounts: &[Account],
    user_rules: &[CategorizationRule],
) -> Result<EntrySuggestion, EngineError> {
    SuggestionEngine::new(user_rules.to_vec()).suggest(transaction, accounts)
}
