//! Typed data model for the bookkeeping engine: accounts, transactions,
//! entries, and categorization rules.

pub mod account;
pub mod entry;
pub mod rule;
pub mod transaction;

pub use account::{Account, AccountType, EntrySide};
pub use entry::{Entry, EntryLine, EntrySuggestion, ProposedEntry};
pub use rule::{
    CategorizationRule, ConditionField, ConditionOperator, ConditionValue, RuleCondition,
};
pub use transaction::TransactionContext;
