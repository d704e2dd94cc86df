//! Split Plan
//!
//! Editable allocation of a new expense among members. A plan holds one
//! [`Allocation`] per candidate member and supports the edits an expense form
//! performs: entering a raw value, toggling a member in or out, and switching
//! the split method.
//!
//! # Editing Rules
//!
//! - **Method switch**: every selected member keeps its current amount and
//!   only its raw value is re-projected into the new method. Switching into
//!   equal redistributes the total.
//! - **Toggle (equal)**: the total is redistributed across the new selection.
//! - **Toggle (other methods)**: only the toggled member is zeroed or
//!   restored from its retained raw value; everyone else is untouched.
//!
//! # Critical Invariants
//!
//! 1. In equal mode the selected amounts always sum to the total
//! 2. For other methods the sum is advisory until [`SplitPlan::validate`]
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::expense::Expense;
use crate::split::calculator::{
    compute_amount, compute_display, equal_shares, SplitError, SplitMethod,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One member's line in a split plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub user_id: String,

    /// Whether the member takes part in the expense
    pub selected: bool,

    /// Value as entered or projected (`"33.33%"`, `"1/3"`, `"12.50"`)
    pub raw_value: String,

    /// Resolved amount (i64 cents); zero when deselected
    pub amount: i64,
}

/// Allocation plan for a new expense
///
/// # Example
/// ```
/// use settlement_ledger_core::split::{SplitMethod, SplitPlan};
///
/// let mut plan = SplitPlan::new(30_000, SplitMethod::Equal, &["alice", "bob", "carol"]).unwrap();
/// assert_eq!(plan.allocated_total(), 30_000);
///
/// // Dropping carol redistributes the total in equal mode
/// plan.toggle("carol").unwrap();
/// assert_eq!(plan.allocation("alice").unwrap().amount, 15_000);
/// assert_eq!(plan.allocation("carol").unwrap().raw_value, "0");
/// assert!(plan.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Amount to allocate (i64 cents)
    total_amount: i64,

    method: SplitMethod,

    /// One line per candidate member, in the order given
    allocations: Vec<Allocation>,
}

impl SplitPlan {
    /// Build a plan with every member selected
    ///
    /// The total starts out split equally and is then projected into `method`,
    /// so a fresh plan always validates.
    pub fn new<S: AsRef<str>>(
        total_amount: i64,
        method: SplitMethod,
        members: &[S],
    ) -> Result<Self, SplitError> {
        if total_amount <= 0 {
            return Err(SplitError::NonPositiveTotal(total_amount));
        }
        if members.is_empty() {
            return Err(SplitError::NoSelection);
        }

        let mut seen = HashSet::with_capacity(members.len());
        let mut allocations = Vec::with_capacity(members.len());
        for member in members {
            let user_id = member.as_ref();
            if !seen.insert(user_id) {
                return Err(SplitError::DuplicateMember(user_id.to_string()));
            }
            allocations.push(Allocation {
                user_id: user_id.to_string(),
                selected: true,
                raw_value: String::new(),
                amount: 0,
            });
        }

        let mut plan = Self {
            total_amount,
            method: SplitMethod::Equal,
            allocations,
        };
        plan.redistribute();
        plan.switch_method(method);
        Ok(plan)
    }

    /// Get total to allocate (i64 cents)
    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    /// Get current split method
    pub fn method(&self) -> SplitMethod {
        self.method
    }

    /// Get all allocation lines
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Look up a member's allocation line
    pub fn allocation(&self, user_id: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.user_id == user_id)
    }

    /// Number of selected members
    pub fn selected_count(&self) -> usize {
        self.allocations.iter().filter(|a| a.selected).count()
    }

    /// Sum of selected members' amounts (i64 cents)
    pub fn allocated_total(&self) -> i64 {
        self.allocations
            .iter()
            .filter(|a| a.selected)
            .map(|a| a.amount)
            .sum()
    }

    /// Amount still unallocated (negative when over-allocated)
    pub fn remaining(&self) -> i64 {
        self.total_amount - self.allocated_total()
    }

    fn index_of(&self, user_id: &str) -> Result<usize, SplitError> {
        self.allocations
            .iter()
            .position(|a| a.user_id == user_id)
            .ok_or_else(|| SplitError::UnknownMember(user_id.to_string()))
    }

    /// Enter a raw value for one member
    ///
    /// Returns `false` in equal mode, where amounts are fixed by the selection
    /// and the value is not applied. A deselected member keeps the value for
    /// when it is restored.
    pub fn set_raw_value(&mut self, user_id: &str, raw_value: &str) -> Result<bool, SplitError> {
        let idx = self.index_of(user_id)?;
        if self.method == SplitMethod::Equal {
            return Ok(false);
        }

        let amount = compute_amount(raw_value, self.method, self.selected_count(), self.total_amount)?;
        let allocation = &mut self.allocations[idx];
        allocation.raw_value = raw_value.to_string();
        if allocation.selected {
            allocation.amount = amount;
        }
        Ok(true)
    }

    /// Flip a member's selection
    ///
    /// Returns the member's new selection state.
    pub fn toggle(&mut self, user_id: &str) -> Result<bool, SplitError> {
        let idx = self.index_of(user_id)?;
        let now_selected = !self.allocations[idx].selected;

        if self.method == SplitMethod::Equal {
            self.allocations[idx].selected = now_selected;
            self.redistribute();
            return Ok(now_selected);
        }

        let amount = if now_selected {
            let count = self.selected_count() + 1;
            compute_amount(&self.allocations[idx].raw_value, self.method, count, self.total_amount)?
        } else {
            0
        };
        let allocation = &mut self.allocations[idx];
        allocation.selected = now_selected;
        allocation.amount = amount;
        Ok(now_selected)
    }

    /// Change the split method
    ///
    /// Amounts carry over from the current method and raw values are
    /// re-projected; switching into equal redistributes instead. A deselected
    /// member's retained raw value is re-projected from the amount it would
    /// restore to, so a later toggle brings the same amount back.
    pub fn switch_method(&mut self, method: SplitMethod) {
        let previous = std::mem::replace(&mut self.method, method);
        if method == SplitMethod::Equal {
            self.redistribute();
            return;
        }

        let count = self.selected_count();
        let total = self.total_amount;
        for allocation in &mut self.allocations {
            let amount = if allocation.selected {
                allocation.amount
            } else if previous == SplitMethod::Equal {
                0
            } else {
                compute_amount(&allocation.raw_value, previous, count + 1, total).unwrap_or(0)
            };
            allocation.raw_value = compute_display(amount, method, count, total);
        }
    }

    /// Recompute every selected member's equal share
    fn redistribute(&mut self) {
        let count = self.selected_count();
        let mut shares = equal_shares(self.total_amount, count).into_iter();
        let total = self.total_amount;

        for allocation in &mut self.allocations {
            allocation.amount = if allocation.selected {
                shares.next().unwrap_or(0)
            } else {
                0
            };
            allocation.raw_value = compute_display(allocation.amount, SplitMethod::Equal, count, total);
        }
    }

    /// Server-side acceptance check: selected amounts must sum to the total
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.selected_count() == 0 {
            return Err(SplitError::NoSelection);
        }
        let allocated = self.allocated_total();
        if allocated != self.total_amount {
            return Err(SplitError::SumMismatch {
                allocated,
                expected: self.total_amount,
            });
        }
        Ok(())
    }

    /// Turn a validated plan into an expense paid by `paid_by`
    ///
    /// Only selected members become expense members.
    pub fn into_expense(
        self,
        group_id: &str,
        paid_by: &str,
        description: &str,
    ) -> Result<Expense, SplitError> {
        self.validate()?;

        let expense = Expense::new(
            group_id.to_string(),
            paid_by.to_string(),
            self.total_amount,
            description,
        );
        Ok(self
            .allocations
            .into_iter()
            .filter(|a| a.selected)
            .fold(expense, |expense, a| expense.with_member(&a.user_id, a.amount)))
    }
}
