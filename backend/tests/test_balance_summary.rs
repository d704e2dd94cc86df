//! Balance Summary Tests
//!
//! Gives/gets views computed over assigned amounts, mirrored on both sides.

use settlement_ledger_core::settlement::{
    aggregate_transactions, summarize_balances, BalanceSummary, PairwiseTransaction,
};
use settlement_ledger_core::Expense;

// ============================================================================
// Test Helpers
// ============================================================================

fn flow(from: &str, to: &str, owed: i64, paid: i64) -> PairwiseTransaction {
    PairwiseTransaction {
        from_user: from.to_string(),
        to_user: to.to_string(),
        total_owed: owed,
        total_paid: paid,
    }
}

fn summary_for<'a>(summaries: &'a [BalanceSummary], user: &str) -> &'a BalanceSummary {
    summaries
        .iter()
        .find(|s| s.user == user)
        .unwrap_or_else(|| panic!("no summary for {}", user))
}

// ============================================================================
// Single Direction
// ============================================================================

#[test]
fn test_one_flow_mirrored_on_both_sides() {
    let summaries = summarize_balances(&[flow("B", "A", 10_000, 0)]);

    let b = summary_for(&summaries, "B");
    assert_eq!(b.gives_total, 10_000);
    assert_eq!(b.gets_total, 0);
    assert_eq!(b.counterparties[0].user, "A");
    assert_eq!(b.counterparties[0].gives, 10_000);

    let a = summary_for(&summaries, "A");
    assert_eq!(a.gets_total, 10_000);
    assert_eq!(a.counterparties[0].user, "B");
    assert_eq!(a.counterparties[0].gets, 10_000);
    assert_eq!(a.net(), 10_000);
    assert_eq!(b.net(), -10_000);
}

#[test]
fn test_settled_amounts_still_count() {
    let summaries = summarize_balances(&[flow("B", "A", 0, 4_000)]);
    assert_eq!(summary_for(&summaries, "B").gives_total, 4_000);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_opposite_flows_cancel_per_counterparty() {
    let summaries = summarize_balances(&[flow("A", "B", 5_000, 0), flow("B", "A", 3_000, 0)]);

    let a = summary_for(&summaries, "A");
    assert_eq!((a.gives_total, a.gets_total), (2_000, 0));
    assert_eq!((a.counterparties[0].gives, a.counterparties[0].gets), (2_000, 0));

    let b = summary_for(&summaries, "B");
    assert_eq!((b.gives_total, b.gets_total), (0, 2_000));
}

#[test]
fn test_exact_cancellation_keeps_user_with_empty_lines() {
    let summaries = summarize_balances(&[flow("A", "B", 3_000, 0), flow("B", "A", 1_000, 2_000)]);

    assert_eq!(summaries.len(), 2, "Both users still get a summary");
    for summary in &summaries {
        assert_eq!(summary.gives_total, 0);
        assert_eq!(summary.gets_total, 0);
        assert!(summary.counterparties.is_empty(), "Zero lines are filtered");
    }
}

#[test]
fn test_totals_offset_across_counterparties() {
    // A gives B 50 and gets 80 from C → overall A gets 30
    let summaries = summarize_balances(&[flow("A", "B", 5_000, 0), flow("C", "A", 8_000, 0)]);

    let a = summary_for(&summaries, "A");
    assert_eq!(a.gives_total, 0);
    assert_eq!(a.gets_total, 3_000);
    assert_eq!(a.counterparties.len(), 2, "Per-counterparty lines are kept");
}

// ============================================================================
// From Expenses
// ============================================================================

#[test]
fn test_summary_from_group_expenses() {
    let cabin = Expense::new("g".to_string(), "A".to_string(), 30_000, "Cabin")
        .with_member("A", 10_000)
        .with_member("B", 10_000)
        .with_member("C", 10_000);
    let fuel = Expense::new("g".to_string(), "B".to_string(), 6_000, "Fuel")
        .with_member("A", 3_000)
        .with_member("B", 3_000);

    let mut entries = cabin.ledger_entries();
    entries.extend(fuel.ledger_entries());
    let summaries = summarize_balances(&aggregate_transactions(&entries));

    let a = summary_for(&summaries, "A");
    assert_eq!(a.gets_total, 17_000, "7_000 net from B plus 10_000 from C");
    let b = summary_for(&summaries, "B");
    assert_eq!(b.gives_total, 7_000);
    let c = summary_for(&summaries, "C");
    assert_eq!(c.gives_total, 10_000);

    let gives: i64 = summaries.iter().map(|s| s.gives_total).sum();
    let gets: i64 = summaries.iter().map(|s| s.gets_total).sum();
    assert_eq!(gives, gets, "Group positions balance out");
}

#[test]
fn test_empty_input() {
    assert!(summarize_balances(&[]).is_empty());
}
