//! Ledger Store
//!
//! The ledger persists nothing itself. Rows live in an external store reached
//! through the [`LedgerStore`] trait, which is constructor-injected into the
//! engine. [`InMemoryLedgerStore`] is the reference implementation used by the
//! CLI and the tests.
//!
//! # Write Contract
//!
//! - `update_entry` is a compare-and-set on the entry's current owed amount;
//!   a mismatch is reported as [`StoreError::Conflict`]
//! - `bulk_update` and `create_entries` are all-or-nothing
//! - Entries that a mutation leaves unchanged are not reported as updated

pub mod memory;

pub use memory::InMemoryLedgerStore;

use crate::models::ledger_entry::{EntryMutation, LedgerEntry, LedgerEntryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a ledger store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entry {0} not found")]
    NotFound(String),

    #[error("Entry {entry_id} changed concurrently: expected owed {expected}, found {actual}")]
    Conflict {
        entry_id: String,
        expected: i64,
        actual: i64,
    },

    #[error("Entry {0} already exists")]
    Duplicate(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(#[from] LedgerEntryError),

    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Row selector for bulk operations
///
/// Unset fields match everything.
///
/// # Example
/// ```
/// use settlement_ledger_core::store::EntryFilter;
///
/// let filter = EntryFilter::for_group("trip").debtor("bob").creditor("alice").pending();
/// assert_eq!(filter.debtor_id.as_deref(), Some("bob"));
/// assert!(filter.pending_only);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub group_id: Option<String>,
    pub expense_id: Option<String>,
    pub debtor_id: Option<String>,
    pub creditor_id: Option<String>,

    /// Only match entries that still owe something
    #[serde(default)]
    pub pending_only: bool,
}

impl EntryFilter {
    pub fn for_group(group_id: &str) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            ..Self::default()
        }
    }

    pub fn for_expense(expense_id: &str) -> Self {
        Self {
            expense_id: Some(expense_id.to_string()),
            ..Self::default()
        }
    }

    pub fn debtor(mut self, user_id: &str) -> Self {
        self.debtor_id = Some(user_id.to_string());
        self
    }

    pub fn creditor(mut self, user_id: &str) -> Self {
        self.creditor_id = Some(user_id.to_string());
        self
    }

    pub fn pending(mut self) -> Self {
        self.pending_only = true;
        self
    }

    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        fn field_matches(want: &Option<String>, actual: &str) -> bool {
            want.as_deref().map_or(true, |w| w == actual)
        }

        field_matches(&self.group_id, entry.group_id())
            && field_matches(&self.expense_id, entry.expense_id())
            && field_matches(&self.debtor_id, entry.debtor_id())
            && field_matches(&self.creditor_id, entry.creditor_id())
            && (!self.pending_only || !entry.is_settled())
    }
}

/// An entry before and after a bulk mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChange {
    pub before: LedgerEntry,
    pub after: LedgerEntry,
}

impl EntryChange {
    /// Amount moved from owed to paid (i64 cents)
    pub fn paid_delta(&self) -> i64 {
        self.after.amount_paid() - self.before.amount_paid()
    }
}

/// Persistence boundary for ledger rows
pub trait LedgerStore: Send + Sync {
    /// All entries of a group, in insertion order
    fn list_group_entries(&self, group_id: &str) -> Result<Vec<LedgerEntry>, StoreError>;

    /// All entries of an expense, in insertion order
    fn list_expense_entries(&self, expense_id: &str) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Apply `mutation` only if the entry still owes `expected_owed`
    fn update_entry(
        &self,
        entry_id: &str,
        expected_owed: i64,
        mutation: EntryMutation,
    ) -> Result<LedgerEntry, StoreError>;

    /// Apply each mutation to every entry its filter matches, atomically
    ///
    /// Returns only the entries that actually changed.
    fn bulk_update(
        &self,
        updates: &[(EntryFilter, EntryMutation)],
    ) -> Result<Vec<EntryChange>, StoreError>;

    /// Insert a batch of entries, atomically
    fn create_entries(&self, entries: Vec<LedgerEntry>) -> Result<(), StoreError>;

    /// Delete matching entries, returning how many were removed
    fn delete_entries(&self, filter: &EntryFilter) -> Result<usize, StoreError>;

    /// Swap the rows matched by `filter` for `entries`
    ///
    /// The default is a delete followed by an insert; stores with
    /// transactions should override it to make the swap atomic.
    fn replace_entries(
        &self,
        filter: &EntryFilter,
        entries: Vec<LedgerEntry>,
    ) -> Result<usize, StoreError> {
        let removed = self.delete_entries(filter)?;
        self.create_entries(entries)?;
        Ok(removed)
    }
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn list_group_entries(&self, group_id: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).list_group_entries(group_id)
    }

    fn list_expense_entries(&self, expense_id: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).list_expense_entries(expense_id)
    }

    fn update_entry(
        &self,
        entry_id: &str,
        expected_owed: i64,
        mutation: EntryMutation,
    ) -> Result<LedgerEntry, StoreError> {
        (**self).update_entry(entry_id, expected_owed, mutation)
    }

    fn bulk_update(
        &self,
        updates: &[(EntryFilter, EntryMutation)],
    ) -> Result<Vec<EntryChange>, StoreError> {
        (**self).bulk_update(updates)
    }

    fn create_entries(&self, entries: Vec<LedgerEntry>) -> Result<(), StoreError> {
        (**self).create_entries(entries)
    }

    fn delete_entries(&self, filter: &EntryFilter) -> Result<usize, StoreError> {
        (**self).delete_entries(filter)
    }

    fn replace_entries(
        &self,
        filter: &EntryFilter,
        entries: Vec<LedgerEntry>,
    ) -> Result<usize, StoreError> {
        (**self).replace_entries(filter, entries)
    }
}
