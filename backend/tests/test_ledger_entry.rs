//! Ledger Entry Tests
//!
//! Construction, status derivation and state transitions of a single row.

use settlement_ledger_core::{EntryMutation, EntryStatus, LedgerEntry, LedgerEntryError};

// ============================================================================
// Test Helpers
// ============================================================================

/// Pending entry where bob owes alice `amount`
fn create_test_entry(amount: i64) -> LedgerEntry {
    LedgerEntry::new(
        "exp_1".to_string(),
        "group_1".to_string(),
        "bob".to_string(),
        "alice".to_string(),
        amount,
    )
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_entry_owes_full_amount() {
    let entry = create_test_entry(10_000);

    assert_eq!(entry.amount_assigned(), 10_000);
    assert_eq!(entry.amount_owed(), 10_000, "New entry should owe everything");
    assert_eq!(entry.amount_paid(), 0);
    assert_eq!(entry.status(), EntryStatus::Pending);
    assert!(!entry.is_self_entry());
}

#[test]
fn test_new_settled_entry_is_paid_from_creation() {
    let entry = LedgerEntry::new_settled(
        "exp_1".to_string(),
        "group_1".to_string(),
        "alice".to_string(),
        "alice".to_string(),
        10_000,
    );

    assert_eq!(entry.amount_owed(), 0);
    assert_eq!(entry.amount_paid(), 10_000);
    assert_eq!(entry.status(), EntryStatus::Settled);
    assert!(entry.is_self_entry());
}

#[test]
fn test_entries_get_unique_ids() {
    let a = create_test_entry(100);
    let b = create_test_entry(100);
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_from_snapshot_preserves_fields() {
    let entry = LedgerEntry::from_snapshot(
        "id_1".to_string(),
        "exp_1".to_string(),
        "group_1".to_string(),
        "bob".to_string(),
        "alice".to_string(),
        1_000,
        400,
        600,
    )
    .unwrap();

    assert_eq!(entry.id(), "id_1");
    assert_eq!(entry.amount_owed(), 400);
    assert_eq!(entry.amount_paid(), 600);
    assert_eq!(entry.status(), EntryStatus::Pending);
}

#[test]
fn test_from_snapshot_rejects_unbalanced_row() {
    let result = LedgerEntry::from_snapshot(
        "id_1".to_string(),
        "exp_1".to_string(),
        "group_1".to_string(),
        "bob".to_string(),
        "alice".to_string(),
        1_000,
        400,
        400,
    );

    assert_eq!(
        result,
        Err(LedgerEntryError::Unbalanced {
            owed: 400,
            paid: 400,
            assigned: 1_000
        })
    );
}

#[test]
fn test_from_snapshot_rejects_negative_amounts() {
    let result = LedgerEntry::from_snapshot(
        "id_1".to_string(),
        "exp_1".to_string(),
        "group_1".to_string(),
        "bob".to_string(),
        "alice".to_string(),
        1_000,
        1_100,
        -100,
    );
    assert_eq!(result, Err(LedgerEntryError::NegativeAmount(-100)));
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_settle_moves_owed_into_paid() {
    let mut entry = create_test_entry(2_500);

    assert!(entry.settle(), "First settle should change the entry");
    assert_eq!(entry.amount_owed(), 0);
    assert_eq!(entry.amount_paid(), 2_500);
    assert!(entry.is_settled());
}

#[test]
fn test_settle_twice_is_noop() {
    let mut entry = create_test_entry(2_500);
    entry.settle();
    let after_first = entry.clone();

    assert!(!entry.settle(), "Second settle should report no change");
    assert_eq!(entry, after_first);
}

#[test]
fn test_apply_set_keeps_conservation() {
    let mut entry = create_test_entry(1_000);

    let changed = entry.apply(EntryMutation::Set { owed: 250, paid: 750 }).unwrap();
    assert!(changed);
    assert_eq!(entry.amount_owed() + entry.amount_paid(), entry.amount_assigned());
    assert_eq!(entry.status(), EntryStatus::Pending);
}

#[test]
fn test_apply_set_to_same_values_reports_unchanged() {
    let mut entry = create_test_entry(1_000);
    let changed = entry
        .apply(EntryMutation::Set {
            owed: 1_000,
            paid: 0,
        })
        .unwrap();
    assert!(!changed);
}

#[test]
fn test_zero_amount_entry_is_settled() {
    let entry = create_test_entry(0);
    assert_eq!(entry.status(), EntryStatus::Settled);
    assert!(entry.validate().is_ok());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_entry_json_roundtrip_keeps_id() {
    let mut entry = create_test_entry(700);
    entry.settle();

    let json = serde_json::to_string(&entry).unwrap();
    let restored: LedgerEntry = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, entry);
    assert!(json.contains("\"amount_paid\":700"));
}
