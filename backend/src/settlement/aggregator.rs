//! Transaction Aggregator
//!
//! Collapses a group's ledger rows into one flow per **ordered** member pair:
//! every entry where `debtor → creditor` contributes its owed amount to
//! `total_owed` and its paid amount to `total_paid`.
//!
//! # Rules
//!
//! - Pairs are ordered: `(A, B)` and `(B, A)` are separate flows
//! - The payer's own rows (`debtor == creditor`) are dropped
//! - Pairs whose sums are both zero are dropped
//! - Output follows the order in which each pair first appears
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::ledger_entry::LedgerEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summed flow from one member to another within a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseTransaction {
    /// Member who owes (the entries' debtor)
    pub from_user: String,

    /// Member who paid (the entries' creditor)
    pub to_user: String,

    /// Sum of outstanding amounts (i64 cents)
    pub total_owed: i64,

    /// Sum of amounts already paid back (i64 cents)
    pub total_paid: i64,
}

impl PairwiseTransaction {
    fn empty(from_user: &str, to_user: &str) -> Self {
        Self {
            from_user: from_user.to_string(),
            to_user: to_user.to_string(),
            total_owed: 0,
            total_paid: 0,
        }
    }

    /// Owed plus paid: everything the debtor was assigned from this creditor
    pub fn total_assigned(&self) -> i64 {
        self.total_owed + self.total_paid
    }
}

/// Group ledger rows into directional pairwise sums
///
/// # Example
/// ```
/// use settlement_ledger_core::LedgerEntry;
/// use settlement_ledger_core::settlement::aggregate_transactions;
///
/// let entry = |debtor: &str, creditor: &str, amount: i64| {
///     LedgerEntry::new("e".into(), "g".into(), debtor.into(), creditor.into(), amount)
/// };
/// let entries = vec![
///     entry("bob", "alice", 5_000),
///     entry("bob", "alice", 2_500),
///     entry("alice", "bob", 1_000),
///     entry("alice", "alice", 9_999), // payer's own row
/// ];
///
/// let flows = aggregate_transactions(&entries);
/// assert_eq!(flows.len(), 2);
/// assert_eq!(flows[0].from_user, "bob");
/// assert_eq!(flows[0].total_owed, 7_500);
/// assert_eq!(flows[1].total_owed, 1_000);
/// ```
pub fn aggregate_transactions(entries: &[LedgerEntry]) -> Vec<PairwiseTransaction> {
    let mut position: HashMap<(&str, &str), usize> = HashMap::new();
    let mut flows: Vec<PairwiseTransaction> = Vec::new();

    for entry in entries {
        if entry.is_self_entry() {
            continue;
        }

        let key = (entry.debtor_id(), entry.creditor_id());
        let idx = *position.entry(key).or_insert_with(|| {
            flows.push(PairwiseTransaction::empty(key.0, key.1));
            flows.len() - 1
        });

        let flow = &mut flows[idx];
        flow.total_owed += entry.amount_owed();
        flow.total_paid += entry.amount_paid();
    }

    flows.retain(|flow| flow.total_owed != 0 || flow.total_paid != 0);
    flows
}
