//! In-memory key/value store with optional per-entry TTL.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{StoreError, StoreResult};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// A key/value map where every entry optionally expires a fixed time after
/// its last write.
///
/// Expiry is checked on every read, so an expired entry is never returned
/// even if [`sweep`](Self::sweep) has not run. The background sweeper only
/// reclaims memory and uses the same expiry instant.
///
/// Time comes from [`tokio::time::Instant`], so tests can pause and advance
/// the clock.
#[derive(Debug)]
pub struct EphemeralStore<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: Option<Duration>,
}

impl<K, V> Default for EphemeralStore<K, V>
where
    K: Eq + Hash + Display,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EphemeralStore<K, V>
where
    K: Eq + Hash + Display,
    V: Clone,
{
    /// A store whose entries live until the process exits.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: None,
        }
    }

    /// A store whose entries expire `ttl` after their last `put`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Per-entry lifetime, if any.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<K, Entry<V>>>> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Read `key`, evicting it first if it has expired.
    pub fn get(&self, key: &K) -> StoreResult<V> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Ok(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                Err(StoreError::NotFound {
                    key: key.to_string(),
                })
            }
            None => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Insert or replace `key`. Replacing resets the expiry.
    ///
    /// A TTL too large to add to the current instant never expires.
    pub fn put(&self, key: K, value: V) -> StoreResult<()> {
        let expires_at = self.ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        self.lock()?.insert(key, Entry { value, expires_at });
        Ok(())
    }

    /// Remove `key`. Returns whether a live entry was removed.
    pub fn delete(&self, key: &K) -> StoreResult<bool> {
        let now = Instant::now();
        Ok(self
            .lock()?
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn sweep(&self) -> StoreResult<usize> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    /// Number of live entries.
    pub fn len(&self) -> StoreResult<usize> {
        let now = Instant::now();
        Ok(self
            .lock()?
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count())
    }

    /// Whether the store has no live entries.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }
}
