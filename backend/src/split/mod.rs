//! Split allocation for new expenses
//!
//! - **calculator**: per-member amount and display math for each method
//! - **plan**: editable plan enforcing the exact-sum acceptance rule

pub mod calculator;
pub mod plan;

pub use calculator::{compute_amount, compute_display, equal_shares, SplitError, SplitMethod};
pub use plan::{Allocation, SplitPlan};
