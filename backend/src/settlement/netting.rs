//! Debt Netting
//!
//! Turns pairwise flows into "who still owes whom" with opposing debts
//! between the same two members cancelled out.
//!
//! # Algorithm
//!
//! Keeps a book of `user → [(counterparty, amount)]` (what each user still
//! owes) and feeds it every flow with `total_owed > 0`, in input order:
//!
//! 1. Look in the creditor's bucket for a reverse debt pointing at the debtor
//! 2. Equal amounts cancel; a larger reverse debt is reduced; a smaller one is
//!    removed and the remainder is booked on the debtor's side
//! 3. Without a reverse debt, the amount is booked on the debtor's side
//!
//! # Example: Bilateral Netting
//!
//! ```text
//! A owes B 50 (expense 1), B owes A 30 (expense 2)
//! Book after expense 1: A → [(B, 50)]
//! Book after expense 2: A → [(B, 20)]
//! ```
//!
//! # Limitation
//!
//! Netting is pairwise only. A→B→C→A chains are **not** cancelled through
//! third parties; each unordered pair is settled on its own.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::settlement::aggregator::PairwiseTransaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A directed debt that survives netting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDebt {
    pub debtor: String,
    pub creditor: String,

    /// Outstanding amount (i64 cents, always positive)
    pub amount: i64,
}

/// Everything one user still owes after netting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwedRecord {
    pub user: String,

    /// Sum of `debts` (i64 cents)
    pub amount: i64,

    /// One line per creditor
    pub debts: Vec<NetDebt>,
}

/// Working book of outstanding debts, keyed by debtor
#[derive(Debug, Default)]
struct DebtBook {
    /// Debtors in the order their bucket was created
    order: Vec<String>,

    /// Debtor → [(creditor, amount)]
    buckets: HashMap<String, Vec<(String, i64)>>,
}

impl DebtBook {
    fn record(&mut self, debtor: &str, creditor: &str, amount: i64) {
        if let Some(bucket) = self.buckets.get_mut(creditor) {
            if let Some(pos) = bucket.iter().position(|(cp, _)| cp == debtor) {
                let reverse = bucket[pos].1;
                if reverse > amount {
                    bucket[pos].1 = reverse - amount;
                    return;
                }

                bucket.remove(pos);
                if reverse < amount {
                    self.book(debtor, creditor, amount - reverse);
                }
                return;
            }
        }

        self.book(debtor, creditor, amount);
    }

    /// Add to the debtor's own bucket, merging with an existing line
    fn book(&mut self, debtor: &str, creditor: &str, amount: i64) {
        if !self.buckets.contains_key(debtor) {
            self.order.push(debtor.to_string());
        }
        let bucket = self.buckets.entry(debtor.to_string()).or_default();

        match bucket.iter_mut().find(|(cp, _)| cp == creditor) {
            Some((_, existing)) => *existing += amount,
            None => bucket.push((creditor.to_string(), amount)),
        }
    }

    fn into_records(mut self) -> Vec<OwedRecord> {
        self.order
            .into_iter()
            .filter_map(|user| {
                let bucket = self.buckets.remove(&user)?;
                let debts: Vec<NetDebt> = bucket
                    .into_iter()
                    .filter(|(_, amount)| *amount > 0)
                    .map(|(creditor, amount)| NetDebt {
                        debtor: user.clone(),
                        creditor,
                        amount,
                    })
                    .collect();
                let amount: i64 = debts.iter().map(|d| d.amount).sum();
                (amount > 0).then_some(OwedRecord { user, amount, debts })
            })
            .collect()
    }
}

/// Net a group's pairwise flows into per-user owed records
///
/// Pure function: the input is only read and a new list is returned.
///
/// # Example
/// ```
/// use settlement_ledger_core::settlement::{net_debts, PairwiseTransaction};
///
/// let flow = |from: &str, to: &str, owed: i64| PairwiseTransaction {
///     from_user: from.to_string(),
///     to_user: to.to_string(),
///     total_owed: owed,
///     total_paid: 0,
/// };
///
/// let records = net_debts(&[flow("A", "B", 5_000), flow("B", "A", 3_000)]);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].user, "A");
/// assert_eq!(records[0].amount, 2_000);
/// assert_eq!(records[0].debts[0].creditor, "B");
/// ```
pub fn net_debts(transactions: &[PairwiseTransaction]) -> Vec<OwedRecord> {
    let mut book = DebtBook::default();

    for tx in transactions {
        if tx.total_owed <= 0 || tx.from_user == tx.to_user {
            continue;
        }
        book.record(&tx.from_user, &tx.to_user, tx.total_owed);
    }

    book.into_records()
}

/// Flatten owed records into a single list of directed debts
pub fn flatten(records: &[OwedRecord]) -> Vec<NetDebt> {
    records
        .iter()
        .flat_map(|record| record.debts.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_debt_reduced_in_place() {
        let mut book = DebtBook::default();
        book.record("A", "B", 100);
        book.record("B", "A", 30);
        assert_eq!(book.buckets["A"], vec![("B".to_string(), 70)]);
        assert!(!book.buckets.contains_key("B"));
    }

    #[test]
    fn test_exact_cancel_leaves_empty_bucket_out_of_records() {
        let mut book = DebtBook::default();
        book.record("A", "B", 100);
        book.record("B", "A", 100);
        assert!(book.buckets["A"].is_empty());
        assert!(book.into_records().is_empty());
    }

    #[test]
    fn test_same_direction_debts_merge() {
        let mut book = DebtBook::default();
        book.record("A", "B", 100);
        book.record("A", "B", 50);
        assert_eq!(book.buckets["A"], vec![("B".to_string(), 150)]);
    }
}
