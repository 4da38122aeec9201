use uuid::Uuid;

use crate::domain::account::EntrySide;
use crate::domain::entry::{EntryLine, ProposedEntry};

/// Tolerance for debit/credit equality checks.
///
/// This absorbs floating-point accumulation error, not rounding policy;
/// amounts are expected to be pre-rounded to currency minor units before they
/// reach the ledger.
pub const BALANCE_EPSILON: f64 = 0.01;

pub(crate) fn within_tolerance(a: f64, b: f64) -> bool {
    (a - b).abs() < BALANCE_EPSILON
}

/// Materializes an accepted entry into its two balanced lines.
///
/// Deterministic: always exactly one debit and one credit with identical
/// amount and currency, with ids `{entry_id}-debit` and `{entry_id}-credit`.
pub fn create_entry_lines(entry: &ProposedEntry, entry_id: Uuid) -> [EntryLine; 2] {
    [
        EntryLine {
            id: format!("{entry_id}-debit"),
            entry_id,
            account_id: entry.debit_account_id,
            side: EntrySide::Debit,
            amount: entry.amount,
            currency: entry.currency.clone(),
        },
        EntryLine {
            id: format!("{entry_id}-credit"),
            entry_id,
            account_id: entry.credit_account_id,
            side: EntrySide::Credit,
            amount: entry.amount,
            currency: entry.currency.clone(),
        },
    ]
}

/// Checks the per-entry balance invariant over an arbitrary-length line set.
///
/// Supports multi-line entries beyond the simple two-line case. Callers must
/// refuse to persist any line set for which this returns `false`; this is a
/// pre-write guard, never a post-hoc correction.
pub fn validate_entry_balance(lines: &[EntryLine]) -> bool {
    let (debits, credits) = debit_credit_totals(lines);
    within_tolerance(debits, credits)
}

pub(crate) fn debit_credit_totals(lines: &[EntryLine]) -> (f64, f64) {
    let mut debits = 0.0;
    let mut credits = 0.0;
    for line in lines {
        match line.side {
            EntrySide::Debit => debits += line.amount,
            EntrySide::Credit => credits += line.amount,
        }
    }
    (debits, credits)
}
