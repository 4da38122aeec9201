use serde::{Deserialize, Serialize};

use crate::domain::account::AccountType;
use crate::domain::transaction::TransactionContext;
use crate::period::DateRange;
use crate::store::LedgerStore;

use super::balance::natural_balance;
use super::{sorted_category_totals, AccountFilter};

/// Parameters for the profit-and-loss report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PnlParams {
    pub range: DateRange,
    #[serde(default)]
    pub filter: AccountFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountAmount {
    pub account: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PnlSection {
    pub total: f64,
    /// Per-account totals derived from entry lines.
    pub items: Vec<AccountAmount>,
    /// Category breakdown derived from raw transactions.
    pub by_category: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitAndLoss {
    pub range: DateRange,
    pub filter: AccountFilter,
    pub revenue: PnlSection,
    pub expenses: PnlSection,
    pub net_income: f64,
    /// Percentage; defined as 0 when revenue is 0.
    pub gross_margin: f64,
}

/// Profit and loss over a date range.
///
/// Primary path: credit-net income and debit-net expense rollups from entry
/// lines. When no entry-line data exists at all, totals fall back to raw
/// transaction amounts; the two paths are alternative data sources selected
/// by availability, never reconciled against each other.
pub fn profit_and_loss(store: &dyn LedgerStore, scope: &str, params: &PnlParams) -> ProfitAndLoss {
    let accounts = params.filter.apply(store.list_accounts(scope));

    let mut revenue_items = Vec::new();
    let mut total_revenue = 0.0;
    let mut expense_items = Vec::new();
    let mut total_expenses = 0.0;

    for account in &accounts {
        match account.account_type {
            AccountType::Income => {
                let amount = natural_balance(store, account, Some(&params.range));
                if amount > 0.0 {
                    revenue_items.push(AccountAmount {
                        account: account.name.clone(),
                        amount,
                    });
                    total_revenue += amount;
                }
            }
            AccountType::Expense => {
                let amount = natural_balance(store, account, Some(&params.range));
                if amount > 0.0 {
                    expense_items.push(AccountAmount {
                        account: account.name.clone(),
                        amount,
                    });
                    total_expenses += amount;
                }
            }
            _ => {}
        }
    }

    let transactions = filtered_transactions(store, scope, params);

    if revenue_items.is_empty() && expense_items.is_empty() {
        for txn in &transactions {
            if txn.amount > 0.0 {
                total_revenue += txn.amount;
            } else {
                total_expenses += txn.amount.abs();
            }
        }
    }

    let revenue_by_category = sorted_category_totals(transactions.iter().filter(|t| t.amount > 0.0));
    let expenses_by_category =
        sorted_category_totals(transactions.iter().filter(|t| t.amount < 0.0));

    let net_income = total_revenue - total_expenses;
    let gross_margin = if total_revenue > 0.0 {
        (total_revenue - total_expenses) / total_revenue * 100.0
    } else {
        0.0
    };

    ProfitAndLoss {
        range: params.range,
        filter: params.filter,
        revenue: PnlSection {
            total: total_revenue,
            items: revenue_items,
            by_category: revenue_by_category,
        },
        expenses: PnlSection {
            total: total_expenses,
            items: expense_items,
            by_category: expenses_by_category,
        },
        net_income,
        gross_margin,
    }
}

fn filtered_transactions(
    store: &dyn LedgerStore,
    scope: &str,
    params: &PnlParams,
) -> Vec<TransactionContext> {
    store
        .list_transactions(scope, Some(&params.range))
        .into_iter()
        .filter(|txn| match params.filter {
            AccountFilter::Business => txn.is_business,
            AccountFilter::Personal => !txn.is_business,
            AccountFilter::Blended => true,
        })
        .collect()
}

// Shared so the financial summary can break categories down the same way.
pub(super) fn top_categories(
    transactions: &[TransactionContext],
    income: bool,
    limit: usize,
) -> Vec<CategoryAmount> {
    let mut totals = sorted_category_totals(
        transactions
            .iter()
            .filter(|t| if income { t.amount > 0.0 } else { t.amount < 0.0 }),
    );
    totals.truncate(limit);
    totals
}
