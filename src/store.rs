use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::entry::{Entry, EntryLine};
use crate::domain::transaction::TransactionContext;
use crate::errors::EngineError;
use crate::ledger::lines::debit_credit_totals;
use crate::ledger::validate_entry_balance;
use crate::period::DateRange;

/// Abstraction over the persistence collaborator.
///
/// The engine core never talks to a concrete database; the application layer
/// supplies an implementation of this trait. `write_entry` is the atomic
/// primitive: both lines of an entry are persisted, or neither. Entry lines
/// are append-only, so concurrent report reads always observe a committed
/// prefix of the ledger.
pub trait LedgerStore {
    fn list_accounts(&self, scope: &str) -> Vec<Account>;
    fn get_account(&self, id: Uuid) -> Option<Account>;
    /// Lines for one account whose parent entry date falls within `range`
    /// (all history when `None`).
    fn list_entry_lines(&self, account_id: Uuid, range: Option<&DateRange>) -> Vec<EntryLine>;
    /// Entries dated within `range` (all history when `None`), in no
    /// particular order.
    fn list_entries(&self, scope: &str, range: Option<&DateRange>) -> Vec<Entry>;
    fn list_transactions(&self, scope: &str, range: Option<&DateRange>)
        -> Vec<TransactionContext>;
    /// All-or-nothing persistence of one entry and its lines. Refuses
    /// imbalanced line sets; this guard runs before any mutation.
    fn write_entry(&mut self, entry: Entry, lines: Vec<EntryLine>) -> Result<(), EngineError>;
}

/// In-memory single-tenant store.
///
/// Reference implementation for tests and bootstrapping; the scope parameter
/// is accepted for interface parity and ignored.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Vec<Account>,
    entries: HashMap<Uuid, Entry>,
    lines: Vec<EntryLine>,
    transactions: Vec<TransactionContext>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        id
    }

    pub fn add_transaction(&mut self, transaction: TransactionContext) {
        self.transactions.push(transaction);
    }

    fn entry_date(&self, entry_id: Uuid) -> Option<chrono::NaiveDate> {
        self.entries.get(&entry_id).map(|entry| entry.date)
    }
}

impl LedgerStore for MemoryStore {
    fn list_accounts(&self, _scope: &str) -> Vec<Account> {
        self.accounts.clone()
    }

    fn get_account(&self, id: Uuid) -> Option<Account> {
        self.accounts.iter().find(|a| a.id == id).cloned()
    }

    fn list_entry_lines(&self, account_id: Uuid, range: Option<&DateRange>) -> Vec<EntryLine> {
        self.lines
            .iter()
            .filter(|line| line.account_id == account_id)
            .filter(|line| match (range, self.entry_date(line.entry_id)) {
                (None, _) => true,
                (Some(range), Some(date)) => range.contains(date),
                (Some(_), None) => false,
            })
            .cloned()
            .collect()
    }

    fn list_entries(&self, _scope: &str, range: Option<&DateRange>) -> Vec<Entry> {
        self.entries
            .values()
            .filter(|entry| range.map_or(true, |range| range.contains(entry.date)))
            .cloned()
            .collect()
    }

    fn list_transactions(
        &self,
        _scope: &str,
        range: Option<&DateRange>,
    ) -> Vec<TransactionContext> {
        self.transactions
            .iter()
            .filter(|txn| range.map_or(true, |range| range.contains(txn.date)))
            .cloned()
            .collect()
    }

    fn write_entry(&mut self, entry: Entry, lines: Vec<EntryLine>) -> Result<(), EngineError> {
        // Validate everything up front so a failure leaves the store untouched.
        for line in &lines {
            if line.entry_id != entry.id {
                return Err(EngineError::ForeignLine {
                    line_id: line.id.clone(),
                    entry_id: entry.id,
                });
            }
            if !self.accounts.iter().any(|a| a.id == line.account_id) {
                return Err(EngineError::UnknownAccount(line.account_id));
            }
        }
        if !validate_entry_balance(&lines) {
            let (debits, credits) = debit_credit_totals(&lines);
            return Err(EngineError::ImbalancedEntry { debits, credits });
        }

        debug!(entry_id = %entry.id, lines = lines.len(), "persisting entry");
        self.entries.insert(entry.id, entry);
        self.lines.extend(lines);
        Ok(())
    }
}
