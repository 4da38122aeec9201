use tracing::debug;

use crate::domain::account::{Account, AccountType};
use crate::domain::entry::EntrySuggestion;
use crate::domain::transaction::TransactionContext;
use crate::errors::EngineError;

const GENERIC_INCOME_CONFIDENCE: f64 = 0.60;
const GENERIC_EXPENSE_CONFIDENCE: f64 = 0.50;

/// Last-resort classification stage.
///
/// Always produces a suggestion or fails loudly: a chart of accounts that
/// cannot host even a generic entry is a setup problem the caller must
/// surface, not retry.
pub fn create_generic_entry(
    transaction: &TransactionContext,
    accounts: &[Account],
) -> Result<EntrySuggestion, EngineError> {
    let bank_account = accounts
        .iter()
        .find(|a| a.account_type == AccountType::Asset)
        .ok_or(EngineError::MissingAccount(AccountType::Asset))?;

    if transaction.is_income() {
        let income_account = accounts
            .iter()
            .find(|a| a.account_type == AccountType::Income && a.name_contains("revenue"))
            .or_else(|| {
                accounts
                    .iter()
                    .find(|a| a.account_type == AccountType::Income)
            })
            .ok_or(EngineError::MissingAccount(AccountType::Income))?;
        debug!(account = %income_account.name, "generic income fallback");
        return Ok(EntrySuggestion {
            debit_account_id: bank_account.id,
            credit_account_id: income_account.id,
            amount: transaction.magnitude(),
            memo: transaction.description.clone(),
            confidence: GENERIC_INCOME_CONFIDENCE,
            explanation: "Generic income entry - please review category".into(),
        });
    }

    // Everything that is not income lands here, zero amounts included.
    let expense_account = accounts
        .iter()
        .find(|a| a.account_type == AccountType::Expense && a.name_contains("uncategorized"))
        .or_else(|| {
            accounts
                .iter()
                .find(|a| a.account_type == AccountType::Expense)
        })
        .ok_or(EngineError::MissingAccount(AccountType::Expense))?;
    debug!(account = %expense_account.name, "generic expense fallback");
    Ok(EntrySuggestion {
        debit_account_id: expense_account.id,
        credit_account_id: bank_account.id,
        amount: transaction.magnitude(),
        memo: transaction.description.clone(),
        confidence: GENERIC_EXPENSE_CONFIDENCE,
        explanation: "Uncategorized expense - please assign category".into(),
    })
}
