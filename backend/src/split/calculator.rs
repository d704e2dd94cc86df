//! Split Calculator
//!
//! Pure allocation math for dividing an expense among members:
//!
//! - **equal**: `total / selected_count`, remainder cents handed out one by one
//! - **percentage**: raw value `"33.33%"`, amount `total * pct / 100`
//! - **fraction**: raw value `"1/3"`, amount `total * num / den`
//! - **custom**: raw value is the amount itself (`"12.50"`)
//!
//! [`compute_amount`] turns a member's raw input into cents, and
//! [`compute_display`] projects cents back into the method's notation.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::core::fraction::{parse_ratio, simplify};
use crate::core::money::{format_cents, format_trimmed, mul_div_round, parse_amount, parse_decimal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Allocation strategy for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    Equal,
    Percentage,
    Fraction,
    Custom,
}

impl SplitMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMethod::Equal => "equal",
            SplitMethod::Percentage => "percentage",
            SplitMethod::Fraction => "fraction",
            SplitMethod::Custom => "custom",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMethod {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(SplitMethod::Equal),
            "percentage" => Ok(SplitMethod::Percentage),
            "fraction" => Ok(SplitMethod::Fraction),
            "custom" => Ok(SplitMethod::Custom),
            _ => Err(SplitError::UnknownMethod(s.to_string())),
        }
    }
}

/// Errors raised by split math and split plan editing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Unknown split method {0:?}")]
    UnknownMethod(String),

    #[error("Malformed {method} value {value:?}")]
    MalformedValue { method: SplitMethod, value: String },

    #[error("Cannot split equally among zero members")]
    NoSelection,

    #[error("Split total must be positive, got {0}")]
    NonPositiveTotal(i64),

    #[error("Member {0} is not part of the split")]
    UnknownMember(String),

    #[error("Member {0} appears more than once")]
    DuplicateMember(String),

    #[error("Selected members are allocated {allocated}, expected {expected}")]
    SumMismatch { allocated: i64, expected: i64 },
}

impl SplitError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            SplitError::UnknownMethod(_) => "method",
            SplitError::MalformedValue { .. } => "raw_value",
            SplitError::NoSelection => "members",
            SplitError::NonPositiveTotal(_) => "total_amount",
            SplitError::UnknownMember(_) | SplitError::DuplicateMember(_) => "user_id",
            SplitError::SumMismatch { .. } => "allocations",
        }
    }

    /// Offending value, rendered for the caller
    pub fn value(&self) -> String {
        match self {
            SplitError::UnknownMethod(value) => value.clone(),
            SplitError::MalformedValue { value, .. } => value.clone(),
            SplitError::NoSelection => "0".to_string(),
            SplitError::NonPositiveTotal(total) => total.to_string(),
            SplitError::UnknownMember(user) | SplitError::DuplicateMember(user) => user.clone(),
            SplitError::SumMismatch { allocated, .. } => allocated.to_string(),
        }
    }
}

fn malformed(method: SplitMethod, value: &str) -> SplitError {
    SplitError::MalformedValue {
        method,
        value: value.to_string(),
    }
}

/// Convert a member's raw input into cents
///
/// For `Equal` the raw value is ignored and the floor share
/// `total / selected_count` is returned; [`equal_shares`] distributes the
/// remainder so a whole plan sums to `total`.
///
/// # Example
/// ```
/// use settlement_ledger_core::split::{compute_amount, SplitMethod};
///
/// assert_eq!(compute_amount("", SplitMethod::Equal, 3, 30_000).unwrap(), 10_000);
/// assert_eq!(compute_amount("25%", SplitMethod::Percentage, 3, 30_000).unwrap(), 7_500);
/// assert_eq!(compute_amount("1/3", SplitMethod::Fraction, 3, 30_000).unwrap(), 10_000);
/// assert_eq!(compute_amount("12.50", SplitMethod::Custom, 3, 30_000).unwrap(), 1_250);
/// ```
pub fn compute_amount(
    raw_value: &str,
    method: SplitMethod,
    selected_count: usize,
    total: i64,
) -> Result<i64, SplitError> {
    match method {
        SplitMethod::Equal => {
            if selected_count == 0 {
                return Err(SplitError::NoSelection);
            }
            Ok(total / selected_count as i64)
        }
        SplitMethod::Percentage => {
            let pct = raw_value
                .trim()
                .strip_suffix('%')
                .ok_or_else(|| malformed(method, raw_value))?;
            let decimal = parse_decimal(pct).map_err(|_| malformed(method, raw_value))?;
            if decimal.numerator < 0 {
                return Err(malformed(method, raw_value));
            }
            decimal
                .denominator
                .checked_mul(100)
                .and_then(|den| mul_div_round(total, decimal.numerator, den))
                .ok_or_else(|| malformed(method, raw_value))
        }
        SplitMethod::Fraction => {
            let (num, den) = parse_ratio(raw_value).ok_or_else(|| malformed(method, raw_value))?;
            mul_div_round(total, num, den).ok_or_else(|| malformed(method, raw_value))
        }
        SplitMethod::Custom => {
            let amount = parse_amount(raw_value).map_err(|_| malformed(method, raw_value))?;
            if amount < 0 {
                return Err(malformed(method, raw_value));
            }
            Ok(amount)
        }
    }
}

/// Project an amount into the method's notation
///
/// - equal: two decimals, `"0"` verbatim for a zero amount
/// - percentage: `round(amount / total * 100, 2)` followed by `%`
/// - fraction: `amount/total` in cents, simplified
/// - custom: the amount with trailing zeros trimmed
///
/// # Example
/// ```
/// use settlement_ledger_core::split::{compute_display, SplitMethod};
///
/// assert_eq!(compute_display(10_000, SplitMethod::Equal, 3, 30_000), "100.00");
/// assert_eq!(compute_display(0, SplitMethod::Equal, 3, 30_000), "0");
/// assert_eq!(compute_display(10_000, SplitMethod::Percentage, 3, 30_000), "33.33%");
/// assert_eq!(compute_display(15_000, SplitMethod::Fraction, 2, 30_000), "1/2");
/// assert_eq!(compute_display(1_250, SplitMethod::Custom, 1, 30_000), "12.5");
/// ```
pub fn compute_display(amount: i64, method: SplitMethod, _selected_count: usize, total: i64) -> String {
    match method {
        SplitMethod::Equal => {
            if amount == 0 {
                "0".to_string()
            } else {
                format_cents(amount)
            }
        }
        SplitMethod::Percentage => {
            let hundredths = mul_div_round(amount, 10_000, total).unwrap_or(0);
            format!("{}%", format_trimmed(hundredths, 2))
        }
        SplitMethod::Fraction => simplify(&format!("{}/{}", amount, total)),
        SplitMethod::Custom => format_trimmed(amount, 2),
    }
}

/// Split `total` into `count` shares that sum to `total` exactly
///
/// Every share is `total / count`; the first `total % count` shares carry one
/// extra cent.
///
/// # Example
/// ```
/// use settlement_ledger_core::split::equal_shares;
///
/// assert_eq!(equal_shares(30_000, 3), vec![10_000, 10_000, 10_000]);
/// assert_eq!(equal_shares(10_000, 3), vec![3_334, 3_333, 3_333]);
/// assert!(equal_shares(10_000, 0).is_empty());
/// ```
pub fn equal_shares(total: i64, count: usize) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as i64;
    let base = total.div_euclid(n);
    let remainder = total.rem_euclid(n) as usize;
    (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}
