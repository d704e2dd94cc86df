//! Settlement Module
//!
//! Everything between raw ledger rows and "who owes whom":
//! - Aggregation of rows into directional pairwise flows
//! - Pairwise debt netting (outstanding amounts only)
//! - Two-sided balance summaries (assigned amounts)
//! - Settlement writes against the ledger store
//!
//! # Critical Invariants
//!
//! 1. **Read-only reports**: aggregation, netting, and summaries never mutate rows
//! 2. **Direction**: a surviving debt always points from debtor to creditor
//! 3. **Conservation**: settlement moves owed into paid and nothing else
//!
//! # Example
//!
//! ```rust
//! use settlement_ledger_core::Expense;
//! use settlement_ledger_core::settlement::{aggregate_transactions, net_debts};
//!
//! let dinner = Expense::new("g".into(), "A".into(), 10_000, "Dinner")
//!     .with_member("A", 5_000)
//!     .with_member("B", 5_000);
//! let taxi = Expense::new("g".into(), "B".into(), 6_000, "Taxi")
//!     .with_member("A", 3_000)
//!     .with_member("B", 3_000);
//!
//! let mut entries = dinner.ledger_entries();
//! entries.extend(taxi.ledger_entries());
//!
//! let records = net_debts(&aggregate_transactions(&entries));
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].user, "B");
//! assert_eq!(records[0].amount, 2_000);
//! ```

pub mod aggregator;
pub mod executor;
pub mod netting;
pub mod summary;

// Re-export public API
pub use aggregator::{aggregate_transactions, PairwiseTransaction};
pub use executor::{SettlementError, SettlementExecutor, SettlementOutcome};
pub use netting::{flatten, net_debts, NetDebt, OwedRecord};
pub use summary::{summarize_balances, BalanceSummary, CounterpartyBalance};
