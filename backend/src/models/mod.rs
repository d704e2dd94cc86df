//! Domain models

pub mod expense;
pub mod ledger_entry;

pub use expense::{Expense, ExpenseError, ExpenseMember};
pub use ledger_entry::{EntryMutation, EntryStatus, LedgerEntry, LedgerEntryError};
