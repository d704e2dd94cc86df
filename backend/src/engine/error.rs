//! Ledger error boundary
//!
//! Every component raises its own error enum; the engine folds them into
//! [`LedgerError`] so the API layer sees five kinds only.

use crate::models::expense::ExpenseError;
use crate::settlement::SettlementError;
use crate::split::SplitError;
use crate::store::StoreError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Rejected input, with the offending field and value
    #[error("Invalid {field}: {value}")]
    Validation { field: String, value: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: String, id: String },

    #[error("{actor} may not do this: {reason}")]
    Forbidden { actor: String, reason: String },

    /// A concurrent settle kept winning after every retry
    #[error("Entry {entry_id} was modified concurrently")]
    Conflict { entry_id: String },

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl LedgerError {
    pub fn validation(field: &str, value: impl Display) -> Self {
        LedgerError::Validation {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        LedgerError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    pub fn forbidden(actor: &str, reason: impl Into<String>) -> Self {
        LedgerError::Forbidden {
            actor: actor.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ExpenseError> for LedgerError {
    fn from(err: ExpenseError) -> Self {
        LedgerError::validation(err.field(), err.value())
    }
}

impl From<SplitError> for LedgerError {
    fn from(err: SplitError) -> Self {
        LedgerError::validation(err.field(), err.value())
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LedgerError::not_found("entry", &id),
            StoreError::Conflict { entry_id, .. } => LedgerError::Conflict { entry_id },
            StoreError::InvalidEntry(inner) => LedgerError::validation("entry", inner),
            other => LedgerError::Store(other),
        }
    }
}

impl From<SettlementError> for LedgerError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::EntryNotFound { member_id, .. } => {
                LedgerError::not_found("member", &member_id)
            }
            SettlementError::Conflict { entry_id } => LedgerError::Conflict { entry_id },
            SettlementError::Store(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err: LedgerError = StoreError::Conflict {
            entry_id: "e1".to_string(),
            expected: 100,
            actual: 0,
        }
        .into();
        assert_eq!(
            err,
            LedgerError::Conflict {
                entry_id: "e1".to_string()
            }
        );
    }

    #[test]
    fn test_backend_failure_passes_through() {
        let err: LedgerError = StoreError::Backend("down".to_string()).into();
        assert!(matches!(err, LedgerError::Store(StoreError::Backend(_))));
    }

    #[test]
    fn test_split_error_keeps_field_and_value() {
        let err: LedgerError = SplitError::UnknownMethod("thirds".to_string()).into();
        assert_eq!(err, LedgerError::validation("method", "thirds"));
    }
}
