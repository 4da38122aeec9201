use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a chart-of-accounts entry.
///
/// The type is immutable once entry lines reference the account; changing it
/// after use would silently flip the sign convention of every historical
/// balance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    /// The side on which this account type accumulates positive balance.
    pub fn natural_side(self) -> EntrySide {
        match self {
            AccountType::Asset | AccountType::Expense => EntrySide::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => EntrySide::Credit,
        }
    }

    /// Conventional statement ordering: assets, liabilities, equity, income,
    /// expenses. Used to sort trial-balance rows.
    pub fn statement_order(self) -> u8 {
        match self {
            AccountType::Asset => 1,
            AccountType::Liability => 2,
            AccountType::Equity => 3,
            AccountType::Income => 4,
            AccountType::Expense => 5,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Income => "income",
            AccountType::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// One of the two posting sides of a double-entry line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    Debit,
    Credit,
}

impl EntrySide {
    pub fn opposite(self) -> EntrySide {
        match self {
            EntrySide::Debit => EntrySide::Credit,
            EntrySide::Credit => EntrySide::Debit,
        }
    }
}

/// A chart-of-accounts entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub account_type: AccountType,
    pub is_business: bool,
    /// Cached balance from bank sync, used by reports only when no entry-line
    /// data exists yet (bootstrapping).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Soft-disable flag. Accounts referenced by entry lines are never
    /// deleted; they are archived instead.
    #[serde(default)]
    pub archived: bool,
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            account_type,
            is_business: false,
            balance: None,
            archived: false,
        }
    }

    pub fn business(mut self) -> Self {
        self.is_business = true;
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// The side on which this account accumulates positive balance.
    pub fn natural_side(&self) -> EntrySide {
        self.account_type.natural_side()
    }

    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}
