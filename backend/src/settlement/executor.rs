//! Settlement Executor
//!
//! The only component that changes amounts on existing ledger rows. Each
//! operation moves entries from **Pending** (`owed > 0`) to **Settled**
//! (`owed = 0`, `paid = assigned`).
//!
//! # Operations
//!
//! - [`SettlementExecutor::settle_one`]: one member's entry for one expense
//! - [`SettlementExecutor::settle_many`]: every pending entry a filter matches
//! - [`SettlementExecutor::settle_all_between_users`]: both directions between
//!   two members, settled independently (no pre-netting)
//!
//! # Critical Invariants
//!
//! 1. **Compare-and-set**: a single-entry write only lands if the entry still
//!    owes what was read, so concurrent settles cannot double-apply `paid`
//! 2. **Idempotence**: settled entries are returned or skipped, never re-summed
//! 3. **Bounded retry**: a conflict is retried `conflict_retries` times
//!    (default 1) with a fresh read before surfacing
//! 4. **Conservation**: `owed + paid == assigned` holds after every write

use crate::models::ledger_entry::{EntryMutation, LedgerEntry};
use crate::store::{EntryChange, EntryFilter, LedgerStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while settling entries
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("No entry for member {member_id} on expense {expense_id}")]
    EntryNotFound {
        expense_id: String,
        member_id: String,
    },

    #[error("Entry {entry_id} kept changing concurrently")]
    Conflict { entry_id: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Entries moved to Settled by one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Entries after settlement, in store order
    pub settled: Vec<LedgerEntry>,

    /// Total moved from owed to paid (i64 cents)
    pub settled_value: i64,
}

impl SettlementOutcome {
    fn from_changes(changes: Vec<EntryChange>) -> Self {
        let settled_value = changes.iter().map(EntryChange::paid_delta).sum();
        Self {
            settled: changes.into_iter().map(|change| change.after).collect(),
            settled_value,
        }
    }

    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

/// Runs settlement writes against a ledger store
///
/// # Example
/// ```
/// use settlement_ledger_core::settlement::SettlementExecutor;
/// use settlement_ledger_core::store::{InMemoryLedgerStore, LedgerStore};
/// use settlement_ledger_core::Expense;
///
/// let store = InMemoryLedgerStore::new();
/// let expense = Expense::new("trip".into(), "alice".into(), 30_000, "Cabin")
///     .with_member("alice", 10_000)
///     .with_member("bob", 10_000)
///     .with_member("carol", 10_000);
/// store.create_entries(expense.ledger_entries()).unwrap();
///
/// let executor = SettlementExecutor::new(&store);
/// let entry = executor.settle_one(&expense.id, "bob").unwrap();
/// assert_eq!(entry.amount_owed(), 0);
/// assert_eq!(entry.amount_paid(), 10_000);
/// ```
pub struct SettlementExecutor<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    conflict_retries: u32,
}

impl<'a, S: LedgerStore + ?Sized> SettlementExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            conflict_retries: 1,
        }
    }

    /// Override how many times a conflicting write is retried
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    /// Run a read-modify-write, retrying on conflict
    fn with_retry<T>(
        &self,
        mut attempt: impl FnMut() -> Result<T, SettlementError>,
    ) -> Result<T, SettlementError> {
        let mut retries_left = self.conflict_retries;
        loop {
            match attempt() {
                Err(SettlementError::Store(StoreError::Conflict { entry_id, .. })) => {
                    if retries_left == 0 {
                        warn!(entry_id = %entry_id, "settlement conflict persisted, giving up");
                        return Err(SettlementError::Conflict { entry_id });
                    }
                    retries_left -= 1;
                    warn!(entry_id = %entry_id, "settlement conflict, retrying with fresh read");
                }
                other => return other,
            }
        }
    }

    fn find_entry(&self, expense_id: &str, member_id: &str) -> Result<LedgerEntry, SettlementError> {
        self.store
            .list_expense_entries(expense_id)?
            .into_iter()
            .find(|entry| entry.debtor_id() == member_id)
            .ok_or_else(|| SettlementError::EntryNotFound {
                expense_id: expense_id.to_string(),
                member_id: member_id.to_string(),
            })
    }

    /// Settle one member's entry for one expense
    ///
    /// An entry that is already settled is returned unchanged.
    pub fn settle_one(&self, expense_id: &str, member_id: &str) -> Result<LedgerEntry, SettlementError> {
        self.with_retry(|| {
            let entry = self.find_entry(expense_id, member_id)?;
            if entry.is_settled() {
                debug!(entry_id = entry.id(), "entry already settled");
                return Ok(entry);
            }

            let settled = self
                .store
                .update_entry(entry.id(), entry.amount_owed(), EntryMutation::Settle)?;
            info!(
                expense_id,
                member_id,
                amount = entry.amount_owed(),
                "settled entry"
            );
            Ok(settled)
        })
    }

    /// Settle every pending entry matched by `filter`
    pub fn settle_many(&self, filter: &EntryFilter) -> Result<SettlementOutcome, SettlementError> {
        let updates = [(filter.clone().pending(), EntryMutation::Settle)];
        let outcome = self.with_retry(|| Ok(SettlementOutcome::from_changes(self.store.bulk_update(&updates)?)))?;
        info!(
            count = outcome.settled_count(),
            value = outcome.settled_value,
            "settled entries in bulk"
        );
        Ok(outcome)
    }

    /// Settle everything `a` owes `b` and everything `b` owes `a` in a group
    ///
    /// Both directions are settled in full and in one store call; the two
    /// sides are not netted against each other first.
    pub fn settle_all_between_users(
        &self,
        group_id: &str,
        a: &str,
        b: &str,
    ) -> Result<SettlementOutcome, SettlementError> {
        let updates = [
            (
                EntryFilter::for_group(group_id).debtor(a).creditor(b).pending(),
                EntryMutation::Settle,
            ),
            (
                EntryFilter::for_group(group_id).debtor(b).creditor(a).pending(),
                EntryMutation::Settle,
            ),
        ];

        let outcome = self.with_retry(|| Ok(SettlementOutcome::from_changes(self.store.bulk_update(&updates)?)))?;
        info!(
            group_id,
            a,
            b,
            count = outcome.settled_count(),
            value = outcome.settled_value,
            "settled all entries between users"
        );
        Ok(outcome)
    }
}
