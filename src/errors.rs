use thiserror::Error;
use uuid::Uuid;

use crate::domain::account::AccountType;

/// Error type covering classification and ledger-write failures.
///
/// Absence of a match is never an error: the rule matcher and standard
/// classifier return `None` and the orchestrator moves on. Errors are reserved
/// for a structurally incomplete chart of accounts and for writes that would
/// corrupt the ledger.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The chart of accounts has no account of the required type, so no entry
    /// can be proposed at all. Callers should surface this as "complete your
    /// chart of accounts"; retrying without fixing the setup fails identically.
    #[error("chart of accounts has no {0} account")]
    MissingAccount(AccountType),

    /// A line set was refused before persistence because debits and credits
    /// do not match within tolerance.
    #[error("entry does not balance: debits {debits:.2}, credits {credits:.2}")]
    ImbalancedEntry { debits: f64, credits: f64 },

    /// A line referenced an entry id other than the one being written.
    #[error("line `{line_id}` does not belong to entry {entry_id}")]
    ForeignLine { line_id: String, entry_id: Uuid },

    /// A write referenced an account the store does not know.
    #[error("unknown account: {0}")]
    UnknownAccount(Uuid),
}
