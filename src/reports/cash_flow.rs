use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountType};
use crate::period::DateRange;
use crate::store::LedgerStore;

use super::balance::{account_balance_as_of, natural_balance};
use super::AccountFilter;

/// Parameters for the cash-flow statement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CashFlowParams {
    pub range: DateRange,
    #[serde(default)]
    pub filter: AccountFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCashFlow {
    /// `YYYY-MM` label.
    pub month: String,
    pub cash_from_operations: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowStatement {
    pub range: DateRange,
    pub filter: AccountFilter,
    pub net_income: f64,
    /// Change in non-cash asset balances over the period.
    pub asset_change: f64,
    /// Change in liability balances over the period.
    pub liability_change: f64,
    pub cash_from_operations: f64,
    /// Not derivable from transaction data alone; absent rather than zero so
    /// consumers can distinguish "none" from "unknown".
    pub cash_from_investing: Option<f64>,
    pub cash_from_financing: Option<f64>,
    pub beginning_cash: f64,
    pub ending_cash: f64,
    pub monthly: Vec<MonthlyCashFlow>,
}

/// Indirect-method cash flow over a date range.
///
/// Operating cash starts from net income and backs out working-capital
/// movement: growth in non-cash assets consumes cash, growth in liabilities
/// frees it. The monthly breakdown approximates each month's operating cash
/// with that month's net income.
pub fn cash_flow(store: &dyn LedgerStore, scope: &str, params: &CashFlowParams) -> CashFlowStatement {
    let accounts = params.filter.apply(store.list_accounts(scope));
    let day_before = params.range.start - Duration::days(1);

    let net_income = net_income_in(store, &accounts, &params.range);

    let mut asset_change = 0.0;
    let mut liability_change = 0.0;
    let mut beginning_cash = 0.0;
    let mut ending_cash = 0.0;

    for account in &accounts {
        match account.account_type {
            AccountType::Asset => {
                let before = account_balance_as_of(store, account, day_before);
                let after = account_balance_as_of(store, account, params.range.end);
                if is_cash_account(account) {
                    beginning_cash += before;
                    ending_cash += after;
                } else {
                    asset_change += after - before;
                }
            }
            AccountType::Liability => {
                let before = account_balance_as_of(store, account, day_before);
                let after = account_balance_as_of(store, account, params.range.end);
                liability_change += after - before;
            }
            _ => {}
        }
    }

    let monthly = params
        .range
        .calendar_months()
        .into_iter()
        .map(|window| MonthlyCashFlow {
            month: window.label,
            cash_from_operations: net_income_in(store, &accounts, &window.range),
        })
        .collect();

    CashFlowStatement {
        range: params.range,
        filter: params.filter,
        net_income,
        asset_change,
        liability_change,
        cash_from_operations: net_income - asset_change + liability_change,
        cash_from_investing: None,
        cash_from_financing: None,
        beginning_cash,
        ending_cash,
        monthly,
    }
}

fn net_income_in(store: &dyn LedgerStore, accounts: &[Account], range: &DateRange) -> f64 {
    let mut net = 0.0;
    for account in accounts {
        match account.account_type {
            AccountType::Income => net += natural_balance(store, account, Some(range)),
            AccountType::Expense => net -= natural_balance(store, account, Some(range)),
            _ => {}
        }
    }
    net
}

fn is_cash_account(account: &Account) -> bool {
    account.account_type == AccountType::Asset
        && ["cash", "checking", "savings"]
            .iter()
            .any(|needle| account.name_contains(needle))
}
