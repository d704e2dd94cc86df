//! Spend Shares
//!
//! How much of a group's spending each member accounts for. A member's amount
//! is the sum of their assigned portions across all expenses, whoever paid.
//! Output is for display (charts, bars); it is never a source of truth for
//! money.
//!
//! - `percentage`: `round(amount / total * 100, 2)`
//! - `fraction`: `amount/total` in cents through the fraction simplifier
//! - `opacity`: linear scale into `[floor, 1.0]` across `[min, max]` amount;
//!   `1.0` for everyone when all amounts are equal

use crate::core::fraction::simplify;
use crate::core::money::mul_div_round;
use crate::models::ledger_entry::LedgerEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest opacity assigned to the smallest share
pub const DEFAULT_OPACITY_FLOOR: f64 = 0.3;

/// One member's share of group spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub user_id: String,

    /// Sum of assigned portions (i64 cents)
    pub amount: i64,

    /// Percent of total spending, two decimals
    pub percentage: f64,

    /// Simplified `amount/total` in cents
    pub fraction: String,

    /// Visual weight in `[floor, 1.0]`
    pub opacity: f64,
}

/// Compute shares with the default opacity floor
///
/// # Example
/// ```
/// use settlement_ledger_core::shares::compute_shares;
/// use settlement_ledger_core::Expense;
///
/// let expense = Expense::new("g".into(), "alice".into(), 4_000, "Dinner")
///     .with_member("alice", 3_000)
///     .with_member("bob", 1_000);
///
/// let shares = compute_shares(&expense.ledger_entries());
/// assert_eq!(shares[0].user_id, "alice");
/// assert_eq!(shares[0].percentage, 75.0);
/// assert_eq!(shares[0].fraction, "3/4");
/// assert_eq!(shares[1].opacity, 0.3);
/// ```
pub fn compute_shares(entries: &[LedgerEntry]) -> Vec<Share> {
    compute_shares_with_floor(entries, DEFAULT_OPACITY_FLOOR)
}

/// Compute shares, scaling opacity into `[opacity_floor, 1.0]`
///
/// Sorted by amount descending, ties by user ID.
pub fn compute_shares_with_floor(entries: &[LedgerEntry], opacity_floor: f64) -> Vec<Share> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.debtor_id()).or_insert(0) += entry.amount_assigned();
    }
    if totals.is_empty() {
        return Vec::new();
    }

    let total: i64 = totals.values().sum();
    let min = totals.values().copied().min().unwrap_or(0);
    let max = totals.values().copied().max().unwrap_or(0);
    let floor = opacity_floor.clamp(0.0, 1.0);

    let mut shares: Vec<Share> = totals
        .into_iter()
        .map(|(user_id, amount)| {
            let hundredths = mul_div_round(amount, 10_000, total).unwrap_or(0);
            let opacity = if max == min {
                1.0
            } else {
                floor + (1.0 - floor) * (amount - min) as f64 / (max - min) as f64
            };

            Share {
                user_id: user_id.to_string(),
                amount,
                percentage: hundredths as f64 / 100.0,
                fraction: simplify(&format!("{}/{}", amount, total)),
                opacity,
            }
        })
        .collect();

    shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.user_id.cmp(&b.user_id)));
    shares
}
