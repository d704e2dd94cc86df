//! Ledger engine configuration

use crate::engine::error::LedgerError;
use crate::shares::DEFAULT_OPACITY_FLOOR;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest snapshot cache lifetime a config may ask for (one day)
pub const MAX_SNAPSHOT_CACHE_TTL_SECS: u64 = 86_400;

/// Tunables for [`LedgerEngine`](crate::engine::LedgerEngine)
///
/// Missing fields in a JSON config fall back to the defaults.
///
/// # Example
/// ```
/// use settlement_ledger_core::LedgerConfig;
///
/// let config: LedgerConfig = serde_json::from_str(r#"{"conflict_retries": 3}"#).unwrap();
/// assert_eq!(config.conflict_retries, 3);
/// assert_eq!(config.snapshot_cache_ttl_secs, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Re-read-and-retry attempts after a settlement conflict
    pub conflict_retries: u32,

    /// How long a group snapshot may be served from the cache
    pub snapshot_cache_ttl_secs: u64,

    /// Opacity given to the smallest spend share
    pub share_opacity_floor: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            conflict_retries: 1,
            snapshot_cache_ttl_secs: 30,
            share_opacity_floor: DEFAULT_OPACITY_FLOOR,
        }
    }
}

impl LedgerConfig {
    pub fn snapshot_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_cache_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.snapshot_cache_ttl_secs > MAX_SNAPSHOT_CACHE_TTL_SECS {
            return Err(LedgerError::validation(
                "snapshot_cache_ttl_secs",
                self.snapshot_cache_ttl_secs,
            ));
        }
        if !(0.0..=1.0).contains(&self.share_opacity_floor) {
            return Err(LedgerError::validation(
                "share_opacity_floor",
                self.share_opacity_floor,
            ));
        }
        Ok(())
    }
}
