use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::EntrySide;
use crate::domain::entry::EntryLine;
use crate::period::DateRange;
use crate::store::LedgerStore;

/// Parameters for the general ledger listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeneralLedgerParams {
    pub range: DateRange,
    /// Restrict the listing to a single account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
}

/// One posting in the listing, with the account's running balance after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub entry_id: Uuid,
    pub memo: String,
    pub account: String,
    pub account_id: Uuid,
    pub debit: f64,
    pub credit: f64,
    /// Natural-side running balance for this row's account, accumulated from
    /// the start of the range.
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralLedger {
    pub range: DateRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub rows: Vec<LedgerRow>,
}

/// Dated entry-line listing in entry-date order.
///
/// Each row carries the posting's debit or credit and the account's running
/// natural-side balance, tracked independently per account so the all-account
/// listing reads the same as the single-account one. Balances start from zero
/// at the range start; prior history belongs to an as-of balance report, not
/// this activity listing.
pub fn general_ledger(
    store: &dyn LedgerStore,
    scope: &str,
    params: &GeneralLedgerParams,
) -> GeneralLedger {
    let accounts: Vec<_> = store
        .list_accounts(scope)
        .into_iter()
        .filter(|account| params.account_id.map_or(true, |id| account.id == id))
        .collect();

    let mut entries = store.list_entries(scope, Some(&params.range));
    entries.sort_by_key(|entry| entry.date);

    let lines_by_account: Vec<Vec<EntryLine>> = accounts
        .iter()
        .map(|account| store.list_entry_lines(account.id, Some(&params.range)))
        .collect();

    let mut running: HashMap<Uuid, f64> = HashMap::new();
    let mut rows = Vec::new();

    for entry in &entries {
        for (account, lines) in accounts.iter().zip(&lines_by_account) {
            for line in lines.iter().filter(|line| line.entry_id == entry.id) {
                let signed = if line.side == account.natural_side() {
                    line.amount
                } else {
                    -line.amount
                };
                let balance = running.entry(account.id).or_insert(0.0);
                *balance += signed;

                let (debit, credit) = match line.side {
                    EntrySide::Debit => (line.amount, 0.0),
                    EntrySide::Credit => (0.0, line.amount),
                };
                rows.push(LedgerRow {
                    date: entry.date,
                    entry_id: entry.id,
                    memo: entry.memo.clone(),
                    account: account.name.clone(),
                    account_id: account.id,
                    debit,
                    credit,
                    balance: *balance,
                });
            }
        }
    }

    GeneralLedger {
        range: params.range,
        account_id: params.account_id,
        rows,
    }
}
