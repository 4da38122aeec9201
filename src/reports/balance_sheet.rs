use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountType};
use crate::ledger::lines::within_tolerance;
use crate::store::LedgerStore;

use super::balance::account_balance_as_of;
use super::profit_loss::AccountAmount;
use super::AccountFilter;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSheetSection {
    pub total: f64,
    pub items: Vec<AccountAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSheet {
    pub as_of: NaiveDate,
    pub filter: AccountFilter,
    pub assets: BalanceSheetSection,
    pub liabilities: BalanceSheetSection,
    pub equity: BalanceSheetSection,
    /// Net of all income and expense activity through `as_of`; folded into
    /// the equity total so the statement balances without a closing process.
    pub retained_earnings: f64,
    pub total_liabilities_and_equity: f64,
    pub is_balanced: bool,
}

/// Balance sheet as of a specific date.
///
/// Accounts with no ledger history fall back to their cached bank balance so
/// a freshly connected book still renders meaningful numbers. Liability
/// balances are shown as positive magnitudes.
pub fn balance_sheet(
    store: &dyn LedgerStore,
    scope: &str,
    as_of: NaiveDate,
    filter: AccountFilter,
) -> BalanceSheet {
    let accounts = filter.apply(store.list_accounts(scope));
    let has_ledger_data = accounts
        .iter()
        .any(|account| !store.list_entry_lines(account.id, None).is_empty());

    let mut assets = BalanceSheetSection {
        total: 0.0,
        items: Vec::new(),
    };
    let mut liabilities = BalanceSheetSection {
        total: 0.0,
        items: Vec::new(),
    };
    let mut equity = BalanceSheetSection {
        total: 0.0,
        items: Vec::new(),
    };
    let mut retained_earnings = 0.0;

    for account in &accounts {
        let balance = if has_ledger_data {
            account_balance_as_of(store, account, as_of)
        } else {
            cached_balance(account)
        };
        match account.account_type {
            AccountType::Asset => push_item(&mut assets, account, balance),
            AccountType::Liability => push_item(&mut liabilities, account, balance.abs()),
            AccountType::Equity => push_item(&mut equity, account, balance),
            AccountType::Income => retained_earnings += balance,
            AccountType::Expense => retained_earnings -= balance,
        }
    }

    let total_liabilities_and_equity = liabilities.total + equity.total + retained_earnings;

    BalanceSheet {
        as_of,
        filter,
        is_balanced: within_tolerance(assets.total, total_liabilities_and_equity),
        assets,
        liabilities,
        equity,
        retained_earnings,
        total_liabilities_and_equity,
    }
}

fn push_item(section: &mut BalanceSheetSection, account: &Account, amount: f64) {
    section.total += amount;
    section.items.push(AccountAmount {
        account: account.name.clone(),
        amount,
    });
}

fn cached_balance(account: &Account) -> f64 {
    account.balance.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::{Entry, ProposedEntry};
    use crate::ledger::create_entry_lines;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(store: &mut MemoryStore, debit: Uuid, credit: Uuid, amount: f64, on: NaiveDate) {
        let entry = Entry::new(on, "entry");
        let proposed = ProposedEntry {
            debit_account_id: debit,
            credit_account_id: credit,
            amount,
            currency: "USD".into(),
            memo: "entry".into(),
        };
        store
            .write_entry(entry.clone(), create_entry_lines(&proposed, entry.id).to_vec())
            .unwrap();
    }

    #[test]
    fn statement_balances_after_mixed_activity() {
        let mut store = MemoryStore::new();
        let checking = store.add_account(Account::new("Checking", AccountType::Asset));
        let card = store.add_account(Account::new("Credit Card", AccountType::Liability));
        let capital = store.add_account(Account::new("Owner Capital", AccountType::Equity));
        let revenue = store.add_account(Account::new("Revenue", AccountType::Income));
        let rent = store.add_account(Account::new("Rent", AccountType::Expense));

        let day = date(2024, 5, 1);
        // Owner funds the business, earns revenue, pays rent on the card.
        post(&mut store, checking, capital, 10_000.0, day);
        post(&mut store, checking, revenue, 4_000.0, day);
        post(&mut store, rent, card, 1_500.0, day);

        let sheet = balance_sheet(&store, "u1", date(2024, 5, 31), AccountFilter::Blended);
        assert_eq!(sheet.assets.total, 14_000.0);
        assert_eq!(sheet.liabilities.total, 1_500.0);
        assert_eq!(sheet.equity.total, 10_000.0);
        assert_eq!(sheet.retained_earnings, 2_500.0);
        assert!(sheet.is_balanced);
        assert_eq!(sheet.total_liabilities_and_equity, 14_000.0);
    }

    #[test]
    fn empty_ledger_falls_back_to_cached_balances() {
        let mut store = MemoryStore::new();
        store.add_account(Account::new("Checking", AccountType::Asset).with_balance(5_200.0));
        store.add_account(Account::new("Credit Card", AccountType::Liability).with_balance(-800.0));

        let sheet = balance_sheet(&store, "u1", date(2024, 5, 31), AccountFilter::Blended);
        assert_eq!(sheet.assets.total, 5_200.0);
        assert_eq!(sheet.liabilities.total, 800.0);
    }

    #[test]
    fn business_filter_drops_personal_accounts() {
        let mut store = MemoryStore::new();
        store.add_account(Account::new("Business Checking", AccountType::Asset).business());
        let personal = store.add_account(Account::new("Personal Checking", AccountType::Asset));
        let revenue =
            store.add_account(Account::new("Revenue", AccountType::Income).business());
        post(&mut store, personal, revenue, 100.0, date(2024, 5, 1));

        let sheet = balance_sheet(&store, "u1", date(2024, 5, 31), AccountFilter::Business);
        assert_eq!(sheet.assets.items.len(), 1);
        assert_eq!(sheet.assets.items[0].account, "Business Checking");
    }
}
