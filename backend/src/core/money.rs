//! Money arithmetic in integer cents
//!
//! Every amount in the ledger is an `i64` count of minor units (cents).
//! User-facing strings such as `"12.50"` or the `"33.33"` part of a
//! percentage are parsed into exact decimals first, and every conversion back
//! into cents goes through [`mul_div_round`], the one rounding policy of the
//! crate: round half away from zero.
//!
//! CRITICAL: All money values are i64 (cents)

use thiserror::Error;

/// Minor units per currency unit
pub const CENTS_PER_UNIT: i64 = 100;

/// Errors raised while parsing user-supplied numbers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Malformed number: {0:?}")]
    Malformed(String),

    #[error("Number out of range: {0:?}")]
    OutOfRange(String),
}

/// An exact decimal value, `numerator / denominator` with a power-of-ten
/// denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    pub numerator: i64,
    pub denominator: i64,
}

/// Parse a plain decimal string (`"12"`, `"-3.5"`, `".25"`) without loss.
///
/// # Example
/// ```
/// use settlement_ledger_core::core::money::{parse_decimal, Decimal};
///
/// assert_eq!(
///     parse_decimal("33.33").unwrap(),
///     Decimal { numerator: 3333, denominator: 100 }
/// );
/// assert!(parse_decimal("1.2.3").is_err());
/// ```
pub fn parse_decimal(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(MoneyError::Malformed(input.to_string()));
    }

    let mut numerator: i64 = 0;
    for b in int_part.bytes().chain(frac_part.bytes()) {
        numerator = numerator
            .checked_mul(10)
            .and_then(|n| n.checked_add(i64::from(b - b'0')))
            .ok_or_else(|| MoneyError::OutOfRange(input.to_string()))?;
    }
    let denominator = u32::try_from(frac_part.len())
        .ok()
        .and_then(|scale| 10i64.checked_pow(scale))
        .ok_or_else(|| MoneyError::OutOfRange(input.to_string()))?;

    Ok(Decimal {
        numerator: if negative { -numerator } else { numerator },
        denominator,
    })
}

/// Parse a currency amount (`"12.50"`) into cents.
///
/// Digits beyond the second decimal place are rounded half away from zero.
pub fn parse_amount(input: &str) -> Result<i64, MoneyError> {
    let decimal = parse_decimal(input)?;
    mul_div_round(decimal.numerator, CENTS_PER_UNIT, decimal.denominator)
        .ok_or_else(|| MoneyError::OutOfRange(input.to_string()))
}

/// Compute `value * num / den`, rounding half away from zero.
///
/// Intermediate products are carried in `i128`. Returns `None` when `den` is
/// zero or the result does not fit in an `i64`.
///
/// # Example
/// ```
/// use settlement_ledger_core::core::money::mul_div_round;
///
/// assert_eq!(mul_div_round(10_000, 1, 3), Some(3_333));
/// assert_eq!(mul_div_round(10_000, 2, 3), Some(6_667));
/// assert_eq!(mul_div_round(5, 1, 2), Some(3));
/// assert_eq!(mul_div_round(-5, 1, 2), Some(-3));
/// assert_eq!(mul_div_round(1, 1, 0), None);
/// ```
pub fn mul_div_round(value: i64, num: i64, den: i64) -> Option<i64> {
    if den == 0 {
        return None;
    }

    let mut product = i128::from(value) * i128::from(num);
    let mut divisor = i128::from(den);
    if divisor < 0 {
        product = -product;
        divisor = -divisor;
    }

    let mut quotient = product / divisor;
    let remainder = product % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient += product.signum();
    }

    i64::try_from(quotient).ok()
}

/// Render cents with exactly two decimals (`1250` → `"12.50"`)
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let unit = CENTS_PER_UNIT.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / unit, abs % unit)
}

/// Render a value scaled by `10^scale`, trimming trailing zeros.
///
/// # Example
/// ```
/// use settlement_ledger_core::core::money::format_trimmed;
///
/// assert_eq!(format_trimmed(5_000, 2), "50");
/// assert_eq!(format_trimmed(3_330, 2), "33.3");
/// assert_eq!(format_trimmed(1_250, 2), "12.5");
/// assert_eq!(format_trimmed(-5, 2), "-0.05");
/// ```
pub fn format_trimmed(value: i64, scale: u32) -> String {
    if scale == 0 {
        return value.to_string();
    }

    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let unit = 10u64.pow(scale);
    let fraction = format!("{:0width$}", abs % unit, width = scale as usize);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{}{}", sign, abs / unit)
    } else {
        format!("{}{}.{}", sign, abs / unit, fraction)
    }
}
