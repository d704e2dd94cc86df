//! Ledger entry model
//!
//! One row per member per expense. Each entry records:
//! - Debtor (the member) and creditor (the member who paid the expense)
//! - Amount assigned to the member for this expense (i64 cents)
//! - How much of that amount is still owed and how much has been paid
//! - Status (Pending, Settled), derived from the owed amount
//!
//! # Critical Invariants
//!
//! 1. **Conservation**: `amount_owed + amount_paid == amount_assigned`
//! 2. **Non-negative**: `amount_owed >= 0` and `amount_paid >= 0`
//! 3. **Settled**: `amount_owed == 0` ⇔ status is `Settled`
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settlement state of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Member still owes part of their assigned amount
    Pending,

    /// Nothing left to pay (`owed == 0`)
    Settled,
}

/// Errors that can occur when building or mutating a ledger entry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerEntryError {
    #[error("Amount must be non-negative, got {0}")]
    NegativeAmount(i64),

    #[error("Owed {owed} plus paid {paid} does not equal assigned {assigned}")]
    Unbalanced { owed: i64, paid: i64, assigned: i64 },
}

/// A state transition applied to a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMutation {
    /// Mark the entry fully paid (`owed = 0`, `paid = assigned`)
    Settle,

    /// Overwrite owed/paid; must keep the conservation invariant
    Set { owed: i64, paid: i64 },
}

/// One member's share of one expense
///
/// # Example
/// ```
/// use settlement_ledger_core::{EntryStatus, LedgerEntry};
///
/// let mut entry = LedgerEntry::new(
///     "exp_1".to_string(),
///     "group_1".to_string(),
///     "bob".to_string(),   // debtor
///     "alice".to_string(), // creditor (paid the expense)
///     10_000,              // $100.00
/// );
/// assert_eq!(entry.status(), EntryStatus::Pending);
///
/// assert!(entry.settle());
/// assert_eq!(entry.amount_owed(), 0);
/// assert_eq!(entry.amount_paid(), 10_000);
///
/// // Settling twice changes nothing
/// assert!(!entry.settle());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier (UUID)
    id: String,

    /// Expense this entry belongs to
    expense_id: String,

    /// Group the expense was recorded in
    group_id: String,

    /// Member who owes (the row's member)
    debtor_id: String,

    /// Member who paid the expense
    creditor_id: String,

    /// Member's portion of the expense (i64 cents)
    amount_assigned: i64,

    /// Portion still outstanding (i64 cents)
    amount_owed: i64,

    /// Portion already paid back (i64 cents)
    amount_paid: i64,
}

impl LedgerEntry {
    /// Create a pending entry with the whole assigned amount outstanding
    ///
    /// # Panics
    /// Panics if `amount_assigned` is negative
    pub fn new(
        expense_id: String,
        group_id: String,
        debtor_id: String,
        creditor_id: String,
        amount_assigned: i64,
    ) -> Self {
        assert!(amount_assigned >= 0, "amount_assigned must be non-negative");

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            expense_id,
            group_id,
            debtor_id,
            creditor_id,
            amount_assigned,
            amount_owed: amount_assigned,
            amount_paid: 0,
        }
    }

    /// Create an entry that is already settled
    ///
    /// Used for the payer's own row: they covered their portion when they paid.
    ///
    /// # Panics
    /// Panics if `amount_assigned` is negative
    pub fn new_settled(
        expense_id: String,
        group_id: String,
        debtor_id: String,
        creditor_id: String,
        amount_assigned: i64,
    ) -> Self {
        let mut entry = Self::new(expense_id, group_id, debtor_id, creditor_id, amount_assigned);
        entry.settle();
        entry
    }

    /// Restore an entry with every field preserved (store rows, snapshots)
    ///
    /// Unlike [`LedgerEntry::new`], invalid amounts are reported rather than
    /// panicking since the data comes from outside the process.
    #[allow(clippy::too_many_arguments)]
    pub fn from_snapshot(
        id: String,
        expense_id: String,
        group_id: String,
        debtor_id: String,
        creditor_id: String,
        amount_assigned: i64,
        amount_owed: i64,
        amount_paid: i64,
    ) -> Result<Self, LedgerEntryError> {
        let entry = Self {
            id,
            expense_id,
            group_id,
            debtor_id,
            creditor_id,
            amount_assigned,
            amount_owed,
            amount_paid,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the conservation and sign invariants
    ///
    /// Deserialized entries bypass the constructors, so stores call this
    /// before accepting rows.
    pub fn validate(&self) -> Result<(), LedgerEntryError> {
        for amount in [self.amount_assigned, self.amount_owed, self.amount_paid] {
            if amount < 0 {
                return Err(LedgerEntryError::NegativeAmount(amount));
            }
        }
        if self.amount_owed.checked_add(self.amount_paid) != Some(self.amount_assigned) {
            return Err(LedgerEntryError::Unbalanced {
                owed: self.amount_owed,
                paid: self.amount_paid,
                assigned: self.amount_assigned,
            });
        }
        Ok(())
    }

    /// Get entry ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get owning expense ID
    pub fn expense_id(&self) -> &str {
        &self.expense_id
    }

    /// Get group ID
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Get debtor (member) ID
    pub fn debtor_id(&self) -> &str {
        &self.debtor_id
    }

    /// Get creditor (payer) ID
    pub fn creditor_id(&self) -> &str {
        &self.creditor_id
    }

    /// Get assigned amount (i64 cents)
    pub fn amount_assigned(&self) -> i64 {
        self.amount_assigned
    }

    /// Get outstanding amount (i64 cents)
    pub fn amount_owed(&self) -> i64 {
        self.amount_owed
    }

    /// Get amount already paid (i64 cents)
    pub fn amount_paid(&self) -> i64 {
        self.amount_paid
    }

    /// Current status, derived from the owed amount
    pub fn status(&self) -> EntryStatus {
        if self.amount_owed == 0 {
            EntryStatus::Settled
        } else {
            EntryStatus::Pending
        }
    }

    /// Check if nothing is owed any more
    pub fn is_settled(&self) -> bool {
        self.amount_owed == 0
    }

    /// Check if this is the payer's own row
    pub fn is_self_entry(&self) -> bool {
        self.debtor_id == self.creditor_id
    }

    /// Mark the entry fully paid
    ///
    /// Returns `true` if the entry changed, `false` if it was already settled.
    pub fn settle(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.amount_owed = 0;
        self.amount_paid = self.amount_assigned;
        true
    }

    /// Apply a state transition
    ///
    /// Returns `Ok(true)` if the entry changed. Rejected transitions leave the
    /// entry untouched.
    pub fn apply(&mut self, mutation: EntryMutation) -> Result<bool, LedgerEntryError> {
        match mutation {
            EntryMutation::Settle => Ok(self.settle()),
            EntryMutation::Set { owed, paid } => {
                let mut next = self.clone();
                next.amount_owed = owed;
                next.amount_paid = paid;
                next.validate()?;

                let changed = next != *self;
                *self = next;
                Ok(changed)
            }
        }
    }
}
