#![doc(test(attr(deny(warnings))))]

//! Ledger Core turns raw bank transactions into balanced double-entry ledger
//! entries and aggregates the resulting ledger into financial reports.
//!
//! The crate is a pure domain engine: persistence is abstracted behind
//! [`store::LedgerStore`], classification behind [`classify::SuggestionEngine`],
//! and every report in [`reports`] is a deterministic function of explicit
//! dates and store contents.

pub mod classify;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod period;
pub mod reports;
pub mod store;

pub use classify::{suggest_entry, SuggestionEngine};
pub use domain::{
    Account, AccountType, CategorizationRule, Entry, EntryLine, EntrySide, EntrySuggestion,
    ProposedEntry, RuleCondition, TransactionContext,
};
pub use errors::EngineError;
pub use ledger::{create_entry_lines, validate_entry_balance, BALANCE_EPSILON};
pub use period::DateRange;
pub use store::{LedgerStore, MemoryStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("ledger_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Ledger Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
