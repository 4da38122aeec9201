//! Read-time report aggregation over the persisted ledger.
//!
//! Every report is a pure computation: it takes explicit dates, recomputes
//! fresh on each call, and produces zero-valued well-formed structures on
//! empty data. Authorization and date defaulting from a wall clock belong to
//! the application layer.

pub mod balance;
pub mod balance_sheet;
pub mod cash_flow;
pub mod derived;
pub mod general_ledger;
pub mod profit_loss;
pub mod trial_balance;

pub use balance::{account_balance_as_of, natural_balance};
pub use balance_sheet::{balance_sheet, BalanceSheet};
pub use cash_flow::{cash_flow, CashFlowParams, CashFlowStatement};
pub use derived::{
    burn_rate_runway, financial_summary, kpi_dashboard, payables_aging, receivables_aging,
    AgingReport, BurnRateParams, BurnRateReport, FinancialSummary, KpiDashboard, SummaryParams,
    SummaryPeriod,
};
pub use general_ledger::{general_ledger, GeneralLedger, GeneralLedgerParams};
pub use profit_loss::{profit_and_loss, PnlParams, ProfitAndLoss};
pub use trial_balance::{trial_balance, TrialBalance};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::account::Account;
use crate::domain::transaction::TransactionContext;

use profit_loss::CategoryAmount;

/// Business/personal scoping applied to accounts and transactions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountFilter {
    Business,
    Personal,
    #[default]
    Blended,
}

impl AccountFilter {
    pub(crate) fn apply(self, accounts: Vec<Account>) -> Vec<Account> {
        match self {
            AccountFilter::Business => accounts.into_iter().filter(|a| a.is_business).collect(),
            AccountFilter::Personal => accounts.into_iter().filter(|a| !a.is_business).collect(),
            AccountFilter::Blended => accounts,
        }
    }
}

/// Display label for a transaction's category breakdowns.
pub(crate) fn category_label(txn: &TransactionContext) -> String {
    txn.category
        .first()
        .cloned()
        .unwrap_or_else(|| "Uncategorized".to_string())
}

/// Unsigned per-category totals, sorted largest first.
pub(crate) fn sorted_category_totals<'a>(
    transactions: impl Iterator<Item = &'a TransactionContext>,
) -> Vec<CategoryAmount> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for txn in transactions {
        *totals.entry(category_label(txn)).or_insert(0.0) += txn.amount.abs();
    }
    let mut out: Vec<CategoryAmount> = totals
        .into_iter()
        .map(|(category, amount)| CategoryAmount { category, amount })
        .collect();
    out.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    out
}
