//! Fraction display helpers
//!
//! Shares and split allocations are shown as `"num/den"` strings. The
//! simplifier performs a single reduction by the largest divisor of the
//! denominator (within `2..=min(num, den)`) that also divides the numerator.
//! It is not an iterative GCD reducer: a zero numerator leaves an empty scan
//! range, so `"0/10"` stays `"0/10"`, and malformed input is echoed back.

/// Split `"num/den"` into two non-negative integers.
///
/// Surrounding whitespace on either side of the slash is ignored.
pub fn parse_ratio(input: &str) -> Option<(i64, i64)> {
    let (num, den) = input.split_once('/')?;
    let num = num.trim();
    let den = den.trim();
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(num) || !is_digits(den) {
        return None;
    }
    Some((num.parse().ok()?, den.parse().ok()?))
}

/// Simplify a `"num/den"` string with one largest-divisor pass.
///
/// # Example
/// ```
/// use settlement_ledger_core::core::fraction::simplify;
///
/// assert_eq!(simplify("50/100"), "1/2");
/// assert_eq!(simplify("7/11"), "7/11");
/// assert_eq!(simplify("0/10"), "0/10");
/// assert_eq!(simplify("not a fraction"), "not a fraction");
/// ```
pub fn simplify(fraction: &str) -> String {
    let Some((num, den)) = parse_ratio(fraction) else {
        return fraction.to_string();
    };

    match largest_shared_divisor(num, den) {
        Some(divisor) => format!("{}/{}", num / divisor, den / divisor),
        None => fraction.to_string(),
    }
}

/// Largest `d` in `2..=min(num, den)` with `den % d == 0 && num % d == 0`.
///
/// Candidates are drawn from the divisors of `den` (enumerated in pairs up to
/// `sqrt(den)`), which visits the same set a linear scan would accept.
fn largest_shared_divisor(num: i64, den: i64) -> Option<i64> {
    let limit = num.min(den);
    if limit < 2 {
        return None;
    }

    let accepts = |d: i64| d >= 2 && d <= limit && num % d == 0;
    let mut best: Option<i64> = None;
    let mut i = 1i64;
    while i <= den / i {
        if den % i == 0 {
            for candidate in [i, den / i] {
                if accepts(candidate) && best.map_or(true, |b| candidate > b) {
                    best = Some(candidate);
                }
            }
        }
        i += 1;
    }
    best
}
