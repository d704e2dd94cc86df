//! Balance Summaries
//!
//! Two-sided view of a group: for every member, how much they give to and
//! get from each counterparty, computed over **assigned** amounts
//! (`total_owed + total_paid`), so settled expenses still count.
//!
//! Each flow `A → B` of amount `x` is mirrored on both sides: `A` gives `x`
//! to `B` and `B` gets `x` from `A`. Within a counterparty line, new amounts
//! first cancel against the opposite column (the same discipline as debt
//! netting), so a line never has both `gives` and `gets` nonzero.
//!
//! # Critical Invariants
//!
//! 1. Per counterparty line, at most one of `gives` / `gets` is nonzero
//! 2. Per user, at most one of `gives_total` / `gets_total` is nonzero
//! 3. `A`'s line for `B` mirrors `B`'s line for `A` (gives ↔ gets)
//!
//! CRITICAL: All money values are i64 (cents)

use crate::settlement::aggregator::PairwiseTransaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Netted position against one counterparty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyBalance {
    pub user: String,

    /// Amount this user gives the counterparty (i64 cents)
    pub gives: i64,

    /// Amount this user gets from the counterparty (i64 cents)
    pub gets: i64,
}

impl CounterpartyBalance {
    fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            gives: 0,
            gets: 0,
        }
    }

    fn add_gives(&mut self, amount: i64) {
        if self.gets >= amount {
            self.gets -= amount;
        } else {
            self.gives += amount - self.gets;
            self.gets = 0;
        }
    }

    fn add_gets(&mut self, amount: i64) {
        if self.gives >= amount {
            self.gives -= amount;
        } else {
            self.gets += amount - self.gives;
            self.gives = 0;
        }
    }

    fn is_zero(&self) -> bool {
        self.gives == 0 && self.gets == 0
    }
}

/// One member's overall position in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub user: String,

    /// Net amount this user gives overall (i64 cents)
    pub gives_total: i64,

    /// Net amount this user gets overall (i64 cents)
    pub gets_total: i64,

    /// Nonzero per-counterparty lines
    pub counterparties: Vec<CounterpartyBalance>,
}

impl BalanceSummary {
    /// Signed position: positive when the user gets money back
    pub fn net(&self) -> i64 {
        self.gets_total - self.gives_total
    }
}

/// Per-user counterparty lines, in first-seen order
#[derive(Debug, Default)]
struct BalanceBook {
    order: Vec<String>,
    lines: HashMap<String, Vec<CounterpartyBalance>>,
}

impl BalanceBook {
    fn line(&mut self, user: &str, counterparty: &str) -> &mut CounterpartyBalance {
        if !self.lines.contains_key(user) {
            self.order.push(user.to_string());
        }
        let lines = self.lines.entry(user.to_string()).or_default();

        let pos = match lines.iter().position(|l| l.user == counterparty) {
            Some(pos) => pos,
            None => {
                lines.push(CounterpartyBalance::new(counterparty));
                lines.len() - 1
            }
        };
        &mut lines[pos]
    }

    fn into_summaries(mut self) -> Vec<BalanceSummary> {
        self.order
            .into_iter()
            .map(|user| {
                let counterparties: Vec<CounterpartyBalance> = self
                    .lines
                    .remove(&user)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|line| !line.is_zero())
                    .collect();

                let gives: i64 = counterparties.iter().map(|l| l.gives).sum();
                let gets: i64 = counterparties.iter().map(|l| l.gets).sum();

                BalanceSummary {
                    user,
                    gives_total: (gives - gets).max(0),
                    gets_total: (gets - gives).max(0),
                    counterparties,
                }
            })
            .collect()
    }
}

/// Build balance summaries from a group's pairwise flows
///
/// Every member that appears in a flow gets a summary, even when their
/// position nets to zero.
///
/// # Example
/// ```
/// use settlement_ledger_core::settlement::{summarize_balances, PairwiseTransaction};
///
/// let flows = vec![
///     PairwiseTransaction { from_user: "A".into(), to_user: "B".into(), total_owed: 3_000, total_paid: 2_000 },
///     PairwiseTransaction { from_user: "B".into(), to_user: "A".into(), total_owed: 0, total_paid: 1_000 },
/// ];
///
/// let summaries = summarize_balances(&flows);
/// let a = summaries.iter().find(|s| s.user == "A").unwrap();
/// let b = summaries.iter().find(|s| s.user == "B").unwrap();
/// assert_eq!((a.gives_total, a.gets_total), (4_000, 0));
/// assert_eq!((b.gives_total, b.gets_total), (0, 4_000));
/// ```
pub fn summarize_balances(transactions: &[PairwiseTransaction]) -> Vec<BalanceSummary> {
    let mut book = BalanceBook::default();

    for tx in transactions {
        let amount = tx.total_assigned();
        if amount <= 0 || tx.from_user == tx.to_user {
            continue;
        }
        book.line(&tx.from_user, &tx.to_user).add_gives(amount);
        book.line(&tx.to_user, &tx.from_user).add_gets(amount);
    }

    book.into_summaries()
}
