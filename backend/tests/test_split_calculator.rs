//! Split Calculator Tests
//!
//! Raw value → cents for each split method, and cents → display notation.

use settlement_ledger_core::split::{
    compute_amount, compute_display, equal_shares, SplitError, SplitMethod,
};

// ============================================================================
// Method Names
// ============================================================================

#[test]
fn test_method_parses_wire_names() {
    assert_eq!("equal".parse::<SplitMethod>().unwrap(), SplitMethod::Equal);
    assert_eq!("Percentage".parse::<SplitMethod>().unwrap(), SplitMethod::Percentage);
    assert_eq!(" fraction ".parse::<SplitMethod>().unwrap(), SplitMethod::Fraction);
    assert_eq!("custom".parse::<SplitMethod>().unwrap(), SplitMethod::Custom);
}

#[test]
fn test_unknown_method_rejected() {
    let err = "thirds".parse::<SplitMethod>().unwrap_err();
    assert_eq!(err, SplitError::UnknownMethod("thirds".to_string()));
    assert_eq!(err.field(), "method");
}

#[test]
fn test_method_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&SplitMethod::Percentage).unwrap(), "\"percentage\"");
    assert_eq!(SplitMethod::Custom.to_string(), "custom");
}

// ============================================================================
// Equal
// ============================================================================

#[test]
fn test_equal_amount_is_floor_share() {
    assert_eq!(compute_amount("", SplitMethod::Equal, 3, 10_000).unwrap(), 3_333);
    assert_eq!(compute_amount("ignored", SplitMethod::Equal, 4, 10_000).unwrap(), 2_500);
}

#[test]
fn test_equal_with_zero_members_rejected() {
    assert_eq!(
        compute_amount("", SplitMethod::Equal, 0, 10_000),
        Err(SplitError::NoSelection)
    );
}

#[test]
fn test_equal_shares_sum_exactly() {
    for (total, count) in [(10_000, 3), (30_000, 3), (1, 4), (99_999, 7)] {
        let shares = equal_shares(total, count);
        assert_eq!(shares.len(), count);
        assert_eq!(shares.iter().sum::<i64>(), total, "{} / {}", total, count);

        let max = *shares.iter().max().unwrap();
        let min = *shares.iter().min().unwrap();
        assert!(max - min <= 1, "Shares differ by at most one cent");
    }
}

// ============================================================================
// Percentage
// ============================================================================

#[test]
fn test_percentage_amounts() {
    assert_eq!(compute_amount("50%", SplitMethod::Percentage, 2, 30_000).unwrap(), 15_000);
    assert_eq!(compute_amount("33.33%", SplitMethod::Percentage, 3, 30_000).unwrap(), 9_999);
    assert_eq!(compute_amount("0%", SplitMethod::Percentage, 3, 30_000).unwrap(), 0);
}

#[test]
fn test_percentage_rounds_half_away_from_zero() {
    // 12.5% of 1.00 = 12.5 cents
    assert_eq!(compute_amount("12.5%", SplitMethod::Percentage, 1, 100).unwrap(), 13);
}

#[test]
fn test_malformed_percentage_rejected() {
    for bad in ["50", "abc%", "-10%", "%"] {
        let err = compute_amount(bad, SplitMethod::Percentage, 2, 30_000).unwrap_err();
        assert!(
            matches!(err, SplitError::MalformedValue { method: SplitMethod::Percentage, .. }),
            "{:?} should be malformed",
            bad
        );
        assert_eq!(err.value(), bad);
    }
}

// ============================================================================
// Fraction
// ============================================================================

#[test]
fn test_fraction_amounts() {
    assert_eq!(compute_amount("1/3", SplitMethod::Fraction, 3, 30_000).unwrap(), 10_000);
    assert_eq!(compute_amount("2/3", SplitMethod::Fraction, 3, 10_000).unwrap(), 6_667);
    assert_eq!(compute_amount("0/5", SplitMethod::Fraction, 3, 10_000).unwrap(), 0);
}

#[test]
fn test_malformed_fraction_rejected() {
    for bad in ["1/0", "half", "1/", "-1/3"] {
        assert!(
            compute_amount(bad, SplitMethod::Fraction, 3, 10_000).is_err(),
            "{:?} should be rejected",
            bad
        );
    }
}

// ============================================================================
// Custom
// ============================================================================

#[test]
fn test_custom_amounts() {
    assert_eq!(compute_amount("12.50", SplitMethod::Custom, 1, 30_000).unwrap(), 1_250);
    assert_eq!(compute_amount("100", SplitMethod::Custom, 1, 30_000).unwrap(), 10_000);
}

#[test]
fn test_negative_custom_amount_rejected() {
    assert!(compute_amount("-1", SplitMethod::Custom, 1, 30_000).is_err());
    assert!(compute_amount("twelve", SplitMethod::Custom, 1, 30_000).is_err());
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn test_display_per_method() {
    assert_eq!(compute_display(10_000, SplitMethod::Equal, 3, 30_000), "100.00");
    assert_eq!(compute_display(0, SplitMethod::Equal, 3, 30_000), "0");
    assert_eq!(compute_display(15_000, SplitMethod::Percentage, 2, 30_000), "50%");
    assert_eq!(compute_display(10_000, SplitMethod::Percentage, 3, 30_000), "33.33%");
    assert_eq!(compute_display(10_000, SplitMethod::Fraction, 3, 30_000), "1/3");
    assert_eq!(compute_display(0, SplitMethod::Fraction, 3, 30_000), "0/30000");
    assert_eq!(compute_display(1_000, SplitMethod::Custom, 3, 30_000), "10");
}
