use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountType};
use crate::ledger::lines::within_tolerance;
use crate::period::DateRange;
use crate::store::LedgerStore;

use super::balance::gross_totals;
use super::AccountFilter;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialBalanceRow {
    pub account: String,
    pub account_type: AccountType,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialBalance {
    pub as_of: NaiveDate,
    pub filter: AccountFilter,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: f64,
    pub total_credits: f64,
    pub is_balanced: bool,
    /// `total_debits - total_credits`; zero (within tolerance) when balanced.
    pub difference: f64,
}

/// Trial balance as of a date.
///
/// Each account's gross debits and credits are netted into a single figure in
/// whichever column it falls on, and rows are ordered assets, liabilities,
/// equity, income, expenses. Because every persisted entry is a balanced
/// pair, total debits equal total credits whenever data comes from the
/// ledger; the cached-balance fallback for a ledger with no entries carries
/// no such guarantee and may legitimately report a difference.
pub fn trial_balance(
    store: &dyn LedgerStore,
    scope: &str,
    as_of: NaiveDate,
    filter: AccountFilter,
) -> TrialBalance {
    let mut accounts = filter.apply(store.list_accounts(scope));
    accounts.sort_by_key(|account| account.account_type.statement_order());

    let range = DateRange::through(as_of);
    let mut rows: Vec<TrialBalanceRow> = Vec::with_capacity(accounts.len());
    let mut has_ledger_data = false;

    for account in &accounts {
        let (debits, credits) = gross_totals(store, account, Some(&range));
        if debits != 0.0 || credits != 0.0 {
            has_ledger_data = true;
        }
        rows.push(netted_row(account, debits - credits));
    }

    if !has_ledger_data {
        rows = accounts.iter().map(cached_row).collect();
    }

    let total_debits: f64 = rows.iter().map(|row| row.debit).sum();
    let total_credits: f64 = rows.iter().map(|row| row.credit).sum();

    TrialBalance {
        as_of,
        filter,
        rows,
        total_debits,
        total_credits,
        is_balanced: within_tolerance(total_debits, total_credits),
        difference: total_debits - total_credits,
    }
}

/// Net debit activity lands in the debit column, net credit activity in the
/// credit column, never both.
fn netted_row(account: &Account, net: f64) -> TrialBalanceRow {
    let (debit, credit) = if net >= 0.0 { (net, 0.0) } else { (0.0, -net) };
    TrialBalanceRow {
        account: account.name.clone(),
        account_type: account.account_type,
        debit,
        credit,
    }
}

fn cached_row(account: &Account) -> TrialBalanceRow {
    let balance = account.balance.unwrap_or(0.0);
    let net = match account.natural_side() {
        crate::domain::account::EntrySide::Debit => balance,
        crate::domain::account::EntrySide::Credit => -balance.abs(),
    };
    netted_row(account, net)
}
