use chrono::NaiveDate;

use crate::domain::account::{Account, EntrySide};
use crate::period::DateRange;
use crate::store::LedgerStore;

/// Rolls an account's entry lines up on its natural balance side.
///
/// Asset and expense accounts grow on debit; liability, equity, and income
/// accounts grow on credit. Every report derives its numbers from this one
/// primitive over different account and date filters.
pub fn natural_balance(
    store: &dyn LedgerStore,
    account: &Account,
    range: Option<&DateRange>,
) -> f64 {
    let natural = account.natural_side();
    store
        .list_entry_lines(account.id, range)
        .iter()
        .map(|line| {
            if line.side == natural {
                line.amount
            } else {
                -line.amount
            }
        })
        .sum()
}

/// Account balance considering every entry line dated on or before `as_of`.
pub fn account_balance_as_of(store: &dyn LedgerStore, account: &Account, as_of: NaiveDate) -> f64 {
    natural_balance(store, account, Some(&DateRange::through(as_of)))
}

/// Gross debit and credit totals for an account within a range, before any
/// natural-side netting. Used by the trial balance.
pub fn gross_totals(
    store: &dyn LedgerStore,
    account: &Account,
    range: Option<&DateRange>,
) -> (f64, f64) {
    let mut debits = 0.0;
    let mut credits = 0.0;
    for line in store.list_entry_lines(account.id, range) {
        match line.side {
            EntrySide::Debit => debits += line.amount,
            EntrySide::Credit => credits += line.amount,
        }
    }
    (debits, credits)
}
