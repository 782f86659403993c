//! Time-boxed memoization of address lookups
//!
//! Entries are replaced wholesale and never mutated in place. Staleness is
//! only enforced at read time: an expired entry is dropped by the lookup
//! that finds it. There is no capacity bound.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::AddressResult;

/// Default entry time-to-live
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub value: AddressResult,
    pub stored_at: DateTime<Utc>,
}

/// Cache key for a reverse (point) lookup
#[must_use]
pub fn reverse_key(latitude: f64, longitude: f64, language: &str) -> String {
    format!("rev:{latitude:.6},{longitude:.6}:{language}")
}

/// Cache key for a forward (address) lookup
#[must_use]
pub fn forward_key(address: &str, language: &str) -> String {
    format!("fwd:{}:{language}", normalize_address(address))
}

/// Trimmed, lowercased, with inner whitespace collapsed
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Process-wide address cache
pub struct GeocodeCache {
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl GeocodeCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    /// Fresh value for `key`, or `None` on a miss
    pub fn get(&self, key: &str) -> Option<AddressResult> {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()?;

        let age = self.clock.now() - entry.stored_at;
        if age <= self.ttl {
            tracing::debug!(key = %entry.key, "Key found and still fresh");
            return Some(entry.value.clone());
        }

        tracing::debug!(key = %entry.key, "Key found but expired");
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only drop the entry we judged stale; a concurrent set may have replaced it.
        if entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, &entry))
        {
            entries.remove(key);
        }
        None
    }

    /// Store `value` under `key`, replacing any previous entry
    pub fn set(&self, key: &str, value: AddressResult) {
        let entry = Arc::new(CacheEntry {
            key: key.to_string(),
            value,
            stored_at: self.clock.now(),
        });
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
