//! Expense model
//!
//! An expense is what the API layer hands to the ledger when a member records
//! a payment on behalf of the group: who paid, how much, and how the amount is
//! split among members. The ledger never stores expenses itself; it turns each
//! one into [`LedgerEntry`] rows.
//!
//! # Acceptance Rule
//!
//! An expense is only accepted when its member amounts add up to the expense
//! amount **exactly**. The payer's own row is created already settled.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::ledger_entry::LedgerEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons an expense is rejected before any row is written
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("Expense amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("Expense has no members")]
    NoMembers,

    #[error("Member {user_id} has negative amount {amount}")]
    NegativeMemberAmount { user_id: String, amount: i64 },

    #[error("Member {0} appears more than once")]
    DuplicateMember(String),

    #[error("Member amounts sum to {sum}, expected {expected}")]
    SumMismatch { sum: i64, expected: i64 },
}

impl ExpenseError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ExpenseError::NonPositiveAmount(_) => "amount",
            ExpenseError::NoMembers => "members",
            ExpenseError::NegativeMemberAmount { .. } => "members.amount",
            ExpenseError::DuplicateMember(_) => "members.user_id",
            ExpenseError::SumMismatch { .. } => "members",
        }
    }

    /// Offending value, rendered for the caller
    pub fn value(&self) -> String {
        match self {
            ExpenseError::NonPositiveAmount(amount) => amount.to_string(),
            ExpenseError::NoMembers => "[]".to_string(),
            ExpenseError::NegativeMemberAmount { amount, .. } => amount.to_string(),
            ExpenseError::DuplicateMember(user_id) => user_id.clone(),
            ExpenseError::SumMismatch { sum, .. } => sum.to_string(),
        }
    }
}

/// One member's portion of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseMember {
    pub user_id: String,

    /// Portion assigned to this member (i64 cents)
    pub amount: i64,
}

/// An expense as submitted by the API layer
///
/// # Example
/// ```
/// use settlement_ledger_core::Expense;
///
/// let expense = Expense::new("trip".to_string(), "alice".to_string(), 30_000, "Cabin")
///     .with_member("alice", 10_000)
///     .with_member("bob", 10_000)
///     .with_member("carol", 10_000);
///
/// assert!(expense.validate().is_ok());
///
/// let entries = expense.ledger_entries();
/// assert_eq!(entries.len(), 3);
/// assert!(entries.iter().find(|e| e.debtor_id() == "alice").unwrap().is_settled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique expense identifier (UUID)
    pub id: String,

    /// Group the expense belongs to
    pub group_id: String,

    /// Member who paid the full amount
    pub paid_by: String,

    /// Total amount paid (i64 cents)
    pub amount: i64,

    #[serde(default)]
    pub description: String,

    /// Members sharing the expense, with their portions
    pub members: Vec<ExpenseMember>,
}

impl Expense {
    /// Create an expense with a fresh ID and no members yet
    pub fn new(group_id: String, paid_by: String, amount: i64, description: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            group_id,
            paid_by,
            amount,
            description: description.to_string(),
            members: Vec::new(),
        }
    }

    /// Add a member portion (builder pattern)
    pub fn with_member(mut self, user_id: &str, amount: i64) -> Self {
        self.members.push(ExpenseMember {
            user_id: user_id.to_string(),
            amount,
        });
        self
    }

    /// Sum of all member portions (i64 cents)
    pub fn members_total(&self) -> i64 {
        self.members.iter().map(|m| m.amount).sum()
    }

    /// Enforce the acceptance rule
    ///
    /// Checks, in order: positive amount, at least one member, non-negative
    /// and unique members, and an exact sum.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if self.amount <= 0 {
            return Err(ExpenseError::NonPositiveAmount(self.amount));
        }
        if self.members.is_empty() {
            return Err(ExpenseError::NoMembers);
        }

        let mut seen = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            if member.amount < 0 {
                return Err(ExpenseError::NegativeMemberAmount {
                    user_id: member.user_id.clone(),
                    amount: member.amount,
                });
            }
            if !seen.insert(member.user_id.as_str()) {
                return Err(ExpenseError::DuplicateMember(member.user_id.clone()));
            }
        }

        let sum = self.members_total();
        if sum != self.amount {
            return Err(ExpenseError::SumMismatch {
                sum,
                expected: self.amount,
            });
        }
        Ok(())
    }

    /// Build one ledger entry per member
    ///
    /// The payer's own entry (if the payer is a member) is settled on
    /// creation; every other entry owes its full portion to the payer.
    /// Callers are expected to [`validate`](Self::validate) first.
    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.members
            .iter()
            .map(|member| {
                let build = if member.user_id == self.paid_by {
                    LedgerEntry::new_settled
                } else {
                    LedgerEntry::new
                };
                build(
                    self.id.clone(),
                    self.group_id.clone(),
                    member.user_id.clone(),
                    self.paid_by.clone(),
                    member.amount,
                )
            })
            .collect()
    }
}
