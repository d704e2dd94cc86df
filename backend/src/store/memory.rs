//! In-memory ledger store
//!
//! A `Mutex`-guarded row list honoring the full [`LedgerStore`] contract.
//! Batch operations work on a copy of the rows and swap it in only when
//! every step succeeded.

use crate::models::ledger_entry::{EntryMutation, LedgerEntry};
use crate::store::{EntryChange, EntryFilter, LedgerStore, StoreError};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe row store backed by a `Vec`
///
/// # Example
/// ```
/// use settlement_ledger_core::store::{InMemoryLedgerStore, LedgerStore};
/// use settlement_ledger_core::Expense;
///
/// let store = InMemoryLedgerStore::new();
/// let expense = Expense::new("trip".into(), "alice".into(), 2_000, "Taxi")
///     .with_member("alice", 1_000)
///     .with_member("bob", 1_000);
/// store.create_entries(expense.ledger_entries()).unwrap();
///
/// assert_eq!(store.list_group_entries("trip").unwrap().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    rows: Mutex<Vec<LedgerEntry>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with rows (e.g. a JSON snapshot)
    pub fn with_entries(entries: Vec<LedgerEntry>) -> Result<Self, StoreError> {
        let store = Self::new();
        store.create_entries(entries)?;
        Ok(store)
    }

    /// Copy of every row, in insertion order
    pub fn snapshot(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<LedgerEntry>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Backend("ledger rows lock poisoned".to_string()))
    }

    fn list_where(&self, filter: &EntryFilter) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }
}

/// Check a batch for invalid rows and ids clashing with `existing` or itself
fn check_new_rows(existing: &[LedgerEntry], entries: &[LedgerEntry]) -> Result<(), StoreError> {
    let mut ids: HashSet<&str> = existing.iter().map(|e| e.id()).collect();
    for entry in entries {
        entry.validate()?;
        if !ids.insert(entry.id()) {
            return Err(StoreError::Duplicate(entry.id().to_string()));
        }
    }
    Ok(())
}

impl LedgerStore for InMemoryLedgerStore {
    fn list_group_entries(&self, group_id: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        self.list_where(&EntryFilter::for_group(group_id))
    }

    fn list_expense_entries(&self, expense_id: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        self.list_where(&EntryFilter::for_expense(expense_id))
    }

    fn update_entry(
        &self,
        entry_id: &str,
        expected_owed: i64,
        mutation: EntryMutation,
    ) -> Result<LedgerEntry, StoreError> {
        let mut rows = self.lock()?;
        let entry = rows
            .iter_mut()
            .find(|e| e.id() == entry_id)
            .ok_or_else(|| StoreError::NotFound(entry_id.to_string()))?;

        if entry.amount_owed() != expected_owed {
            return Err(StoreError::Conflict {
                entry_id: entry_id.to_string(),
                expected: expected_owed,
                actual: entry.amount_owed(),
            });
        }

        entry.apply(mutation)?;
        Ok(entry.clone())
    }

    fn bulk_update(
        &self,
        updates: &[(EntryFilter, EntryMutation)],
    ) -> Result<Vec<EntryChange>, StoreError> {
        let mut rows = self.lock()?;
        let mut working = rows.clone();
        let mut changes = Vec::new();

        for (filter, mutation) in updates {
            for entry in working.iter_mut().filter(|e| filter.matches(e)) {
                let before = entry.clone();
                if entry.apply(*mutation)? {
                    changes.push(EntryChange {
                        before,
                        after: entry.clone(),
                    });
                }
            }
        }

        *rows = working;
        Ok(changes)
    }

    fn create_entries(&self, entries: Vec<LedgerEntry>) -> Result<(), StoreError> {
        let mut rows = self.lock()?;
        check_new_rows(&rows, &entries)?;
        rows.extend(entries);
        Ok(())
    }

    fn delete_entries(&self, filter: &EntryFilter) -> Result<usize, StoreError> {
        let mut rows = self.lock()?;
        let before = rows.len();
        rows.retain(|entry| !filter.matches(entry));
        Ok(before - rows.len())
    }

    fn replace_entries(
        &self,
        filter: &EntryFilter,
        entries: Vec<LedgerEntry>,
    ) -> Result<usize, StoreError> {
        let mut rows = self.lock()?;
        let kept: Vec<LedgerEntry> = rows
            .iter()
            .filter(|entry| !filter.matches(entry))
            .cloned()
            .collect();
        check_new_rows(&kept, &entries)?;

        let removed = rows.len() - kept.len();
        *rows = kept;
        rows.extend(entries);
        Ok(removed)
    }
}
