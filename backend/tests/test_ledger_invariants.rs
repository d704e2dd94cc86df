//! Property tests for ledger-wide invariants.

use proptest::prelude::*;
use proptest::sample::{subsequence, Index};

use settlement_ledger_core::core::fraction::simplify;
use settlement_ledger_core::settlement::{aggregate_transactions, net_debts, summarize_balances};
use settlement_ledger_core::shares::compute_shares;
use settlement_ledger_core::split::equal_shares;
use settlement_ledger_core::{Expense, InMemoryLedgerStore, LedgerEngine, LedgerEntry, LedgerStore};
use std::collections::{HashMap, HashSet};

const MEMBERS: [&str; 5] = ["A", "B", "C", "D", "E"];

// ============================================================================
// Strategies
// ============================================================================

/// An expense in group "g" split equally among a non-empty subset of members
fn expense_strategy() -> impl Strategy<Value = Expense> {
    (
        0..MEMBERS.len(),
        1i64..100_000,
        subsequence(MEMBERS.to_vec(), 1..=MEMBERS.len()),
    )
        .prop_map(|(payer, amount, members)| {
            let shares = equal_shares(amount, members.len());
            members.iter().zip(shares).fold(
                Expense::new("g".to_string(), MEMBERS[payer].to_string(), amount, ""),
                |expense, (user, share)| expense.with_member(user, share),
            )
        })
}

fn group_strategy() -> impl Strategy<Value = Vec<Expense>> {
    proptest::collection::vec(expense_strategy(), 1..12)
}

/// Entries of a group after settling a random selection of (expense, member)
fn settled_group(expenses: &[Expense], picks: &[(Index, Index)]) -> Vec<LedgerEntry> {
    let engine = LedgerEngine::new(InMemoryLedgerStore::new());
    for expense in expenses {
        engine.create_expense(expense).unwrap();
    }
    for (expense_pick, member_pick) in picks {
        let expense = expense_pick.get(expenses);
        let member = &member_pick.get(&expense.members).user_id;
        engine.settle_entry(&expense.paid_by, &expense.id, member).unwrap();
    }
    engine.store().list_group_entries("g").unwrap()
}

/// Per-user outstanding position: positive when the user is owed money
fn outstanding_positions<'a>(pairs: impl Iterator<Item = (&'a str, &'a str, i64)>) -> HashMap<String, i64> {
    let mut positions = HashMap::new();
    for (debtor, creditor, amount) in pairs {
        *positions.entry(debtor.to_string()).or_insert(0) -= amount;
        *positions.entry(creditor.to_string()).or_insert(0) += amount;
    }
    positions.retain(|_, v| *v != 0);
    positions
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: owed + paid over an expense's rows equals its amount, before
    /// and after any settlement.
    #[test]
    fn property_conservation_holds_through_settlement(
        expenses in group_strategy(),
        picks in proptest::collection::vec(any::<(Index, Index)>(), 0..16),
    ) {
        let entries = settled_group(&expenses, &picks);

        for expense in &expenses {
            let total: i64 = entries
                .iter()
                .filter(|e| e.expense_id() == expense.id)
                .map(|e| e.amount_owed() + e.amount_paid())
                .sum();
            prop_assert_eq!(total, expense.amount);
        }
        for entry in &entries {
            prop_assert!(entry.validate().is_ok());
        }
    }

    /// PROPERTY: netting never reports both A→B and B→A.
    #[test]
    fn property_netting_is_one_directional(
        expenses in group_strategy(),
        picks in proptest::collection::vec(any::<(Index, Index)>(), 0..8),
    ) {
        let entries = settled_group(&expenses, &picks);
        let records = net_debts(&aggregate_transactions(&entries));

        let mut seen = HashSet::new();
        for debt in records.iter().flat_map(|r| r.debts.iter()) {
            prop_assert!(debt.amount > 0);
            prop_assert!(debt.debtor != debt.creditor);
            prop_assert!(
                !seen.contains(&(debt.creditor.clone(), debt.debtor.clone())),
                "both directions reported for {} and {}", debt.debtor, debt.creditor
            );
            seen.insert((debt.debtor.clone(), debt.creditor.clone()));
        }
    }

    /// PROPERTY: netting preserves every user's outstanding position.
    #[test]
    fn property_netting_preserves_positions(expenses in group_strategy()) {
        let entries = settled_group(&expenses, &[]);
        let flows = aggregate_transactions(&entries);
        let records = net_debts(&flows);

        let before = outstanding_positions(
            flows.iter().map(|f| (f.from_user.as_str(), f.to_user.as_str(), f.total_owed)),
        );
        let after = outstanding_positions(
            records
                .iter()
                .flat_map(|r| r.debts.iter())
                .map(|d| (d.debtor.as_str(), d.creditor.as_str(), d.amount)),
        );
        prop_assert_eq!(before, after);
    }

    /// PROPERTY: a summary never has both gives_total and gets_total nonzero.
    #[test]
    fn property_balance_totals_are_exclusive(expenses in group_strategy()) {
        let entries = settled_group(&expenses, &[]);
        for summary in summarize_balances(&aggregate_transactions(&entries)) {
            prop_assert!(summary.gives_total == 0 || summary.gets_total == 0);
            for line in &summary.counterparties {
                prop_assert!(line.gives == 0 || line.gets == 0);
            }
        }
    }

    /// PROPERTY: share percentages sum to 100 within rounding error.
    #[test]
    fn property_share_percentages_sum_to_hundred(expenses in group_strategy()) {
        let entries = settled_group(&expenses, &[]);
        let sum: f64 = compute_shares(&entries).iter().map(|s| s.percentage).sum();
        prop_assert!((sum - 100.0).abs() <= 0.1, "sum was {}", sum);
    }

    /// PROPERTY: equal shares sum to the total exactly and differ by at most one cent.
    #[test]
    fn property_equal_split_is_exact(total in 1i64..10_000_000, count in 1usize..50) {
        let shares = equal_shares(total, count);
        prop_assert_eq!(shares.len(), count);
        prop_assert_eq!(shares.iter().sum::<i64>(), total);
        let max = *shares.iter().max().unwrap();
        let min = *shares.iter().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    /// PROPERTY: the simplifier keeps the ratio's value.
    #[test]
    fn property_simplify_keeps_value(num in 1i64..5_000, den in 1i64..5_000) {
        let simplified = simplify(&format!("{}/{}", num, den));
        let (n, d) = simplified.split_once('/').unwrap();
        let n: i64 = n.parse().unwrap();
        let d: i64 = d.parse().unwrap();
        prop_assert_eq!(n * den, d * num);
    }
}
