//! Engine Module
//!
//! The API-facing boundary of the ledger: configuration, the error type every
//! operation returns, and [`LedgerEngine`] itself.

pub mod config;
pub mod error;
pub mod ledger;

pub use config::{LedgerConfig, MAX_SNAPSHOT_CACHE_TTL_SECS};
pub use error::LedgerError;
pub use ledger::LedgerEngine;
