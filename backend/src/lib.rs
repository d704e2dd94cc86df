//! Settlement Ledger Core
//!
//! Group expense ledger: splits expenses among members, records one ledger
//! row per member, and answers "who owes whom" with pairwise netting.
//!
//! # Architecture
//!
//! - **core**: Money parsing, rounding and the fraction simplifier
//! - **models**: Domain types (LedgerEntry, Expense)
//! - **split**: Split methods and editable split plans
//! - **settlement**: Aggregation, debt netting, balance summaries, settlement writes
//! - **shares**: Per-member spend shares for display
//! - **store**: Ledger store trait and in-memory implementation
//! - **cache**: Snapshot cache trait and implementations
//! - **engine**: API-facing facade, configuration and errors
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. One rounding policy everywhere (round half away from zero)
//! 3. `owed + paid == assigned` for every ledger entry, at all times

// Module declarations
pub mod cache;
pub mod core;
pub mod engine;
pub mod models;
pub mod settlement;
pub mod shares;
pub mod split;
pub mod store;

// Re-exports for convenience
pub use cache::{CacheClient, InMemoryCache, NoopCache};
pub use engine::{LedgerConfig, LedgerEngine, LedgerError};
pub use models::{
    expense::{Expense, ExpenseError, ExpenseMember},
    ledger_entry::{EntryMutation, EntryStatus, LedgerEntry, LedgerEntryError},
};
pub use settlement::{
    BalanceSummary, CounterpartyBalance, NetDebt, OwedRecord, PairwiseTransaction,
    SettlementError, SettlementExecutor, SettlementOutcome,
};
pub use shares::Share;
pub use split::{SplitError, SplitMethod, SplitPlan};
pub use store::{EntryFilter, InMemoryLedgerStore, LedgerStore, StoreError};
