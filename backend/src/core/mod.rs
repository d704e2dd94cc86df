//! Numeric helpers shared by the split and share calculators

pub mod fraction;
pub mod money;

pub use fraction::simplify;
pub use money::{format_cents, mul_div_round, parse_amount, MoneyError};
