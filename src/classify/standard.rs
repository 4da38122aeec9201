use once_cell::sync::Lazy;
use tracing::debug;

use crate::domain::account::{Account, AccountType};
use crate::domain::entry::EntrySuggestion;
use crate::domain::transaction::TransactionContext;

use super::Classify;

const INCOME_CONFIDENCE: f64 = 0.85;
const EXPENSE_CONFIDENCE: f64 = 0.80;

/// Canonical bank-category keywords, mapping aggregator category names to the
/// account-name keywords they imply.
static CATEGORY_KEYWORDS: Lazy<Vec<(&'static str, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        ("food_and_drink", &["meals", "restaurant", "food", "dining"][..]),
        ("general_merchandise", &["supplies", "merchandise", "general"][..]),
        ("travel", &["travel", "transportation"][..]),
        ("gas_stations", &["fuel", "gas", "transportation"][..]),
        ("software", &["software", "subscriptions", "technology"][..]),
        ("office_supplies", &["office", "supplies"][..]),
        ("professional_services", &["professional", "services", "consulting"][..]),
    ]
});

/// Built-in heuristics mapping bank-provided categories to accounts when no
/// user rule matched.
pub struct StandardClassifier;

impl Classify for StandardClassifier {
    fn try_classify(
        &self,
        transaction: &TransactionContext,
        accounts: &[Account],
    ) -> Option<EntrySuggestion> {
        // Without a cash-side account no suggestion can be built at all.
        let bank_account = accounts
            .iter()
            .find(|a| a.account_type == AccountType::Asset && a.name_contains("checking"))
            .or_else(|| accounts.iter().find(|a| a.account_type == AccountType::Asset))?;

        if transaction.is_income() {
            let income_account =
                find_account_by_category(accounts, AccountType::Income, &transaction.category)?;
            debug!(account = %income_account.name, "standard classifier matched income");
            return Some(EntrySuggestion {
                debit_account_id: bank_account.id,
                credit_account_id: income_account.id,
                amount: transaction.magnitude(),
                memo: transaction.description.clone(),
                confidence: INCOME_CONFIDENCE,
                explanation: format!("Income transaction: {}", income_account.name),
            });
        }

        if transaction.is_expense() {
            let expense_account = find_account_by_category(
                accounts,
                AccountType::Expense,
                transaction.effective_categories(),
            )?;
            debug!(account = %expense_account.name, "standard classifier matched expense");
            let source = transaction
                .category
                .first()
                .map(String::as_str)
                .unwrap_or("category");
            return Some(EntrySuggestion {
                debit_account_id: expense_account.id,
                credit_account_id: bank_account.id,
                amount: transaction.magnitude(),
                memo: transaction.description.clone(),
                confidence: EXPENSE_CONFIDENCE,
                explanation: format!("Expense: {} (from {})", expense_account.name, source),
            });
        }

        None
    }
}

/// Finds an account of the requested type matching the first category string.
///
/// The category is checked against the canonical keyword table (key or any
/// keyword as a substring); matching keywords are then searched in account
/// names. Falls back to any account of the requested type: a weak match by
/// design, reflected in the stage confidences rather than rejected here.
/// Returns `None` only when `categories` is empty or no account of the type
/// exists at all.
pub fn find_account_by_category<'a>(
    accounts: &'a [Account],
    account_type: AccountType,
    categories: &[String],
) -> Option<&'a Account> {
    let category = categories.first()?.to_lowercase();

    for (key, keywords) in CATEGORY_KEYWORDS.iter() {
        let table_hit =
            category.contains(key) || keywords.iter().any(|keyword| category.contains(keyword));
        if !table_hit {
            continue;
        }
        let by_keyword = accounts.iter().find(|a| {
            a.account_type == account_type
                && keywords.iter().any(|keyword| a.name_contains(keyword))
        });
        if by_keyword.is_some() {
            return by_keyword;
        }
    }

    accounts.iter().find(|a| a.account_type == account_type)
}
