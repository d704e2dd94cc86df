//! Snapshot cache
//!
//! The engine may read a group's ledger rows through an injected
//! [`CacheClient`]. Only the read/invalidate contract matters here: derived
//! reports are never cached, and every write to a group invalidates its key.
//! Expiry policy belongs to the cache implementation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Key-value cache with per-entry time-to-live
pub trait CacheClient: Send + Sync {
    /// Fetch a live value
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value for `ttl`
    fn set(&self, key: &str, value: String, ttl: Duration);

    /// Drop a value, if present
    fn invalidate(&self, key: &str);
}

/// Cache that never holds anything; every read goes to the store
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl CacheClient for NoopCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: String, _ttl: Duration) {}

    fn invalidate(&self, _key: &str) {}
}

/// Process-local cache with lazy expiry
///
/// # Example
/// ```
/// use settlement_ledger_core::cache::{CacheClient, InMemoryCache};
/// use std::time::Duration;
///
/// let cache = InMemoryCache::new();
/// cache.set("k", "v".to_string(), Duration::from_secs(60));
/// assert_eq!(cache.get("k").as_deref(), Some("v"));
///
/// cache.invalidate("k");
/// assert_eq!(cache.get("k"), None);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    /// key → (value, expires_at); `None` never expires
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheClient for InMemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        let (value, expires_at) = entries.get(key)?.clone();
        if expires_at.map_or(true, |at| at > Instant::now()) {
            Some(value)
        } else {
            entries.remove(key);
            None
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), (value, Instant::now().checked_add(ttl)));
        }
    }

    fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}
