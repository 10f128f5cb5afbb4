//! Process-local session store with lazy expiry.

use crate::conversation::ports::{SessionResult, SessionStore, SessionStoreError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<DateTime<Utc>>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expiry| now < expiry)
    }
}

/// Minimum clock time between two sweeps triggered by writes.
const SWEEP_INTERVAL: Duration = Duration::minutes(1);

#[derive(Debug)]
struct Table<K, V> {
    entries: HashMap<K, Entry<V>>,
    next_sweep: Option<DateTime<Utc>>,
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash,
{
    fn purge(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        self.next_sweep = Some(now + SWEEP_INTERVAL);
        before - self.entries.len()
    }

    /// Purges expired entries at most once per [`SWEEP_INTERVAL`].
    fn sweep_if_due(&mut self, now: DateTime<Utc>) {
        if self.next_sweep.is_none_or(|due| now >= due) {
            self.purge(now);
        }
    }
}

/// Thread-safe in-memory session store.
///
/// Expired entries are dropped when next touched, by a sweep that every
/// write runs at most once a minute, or by [`Self::purge_expired`].
/// Contents are lost with the process.
pub struct InMemorySessionStore<K, V> {
    table: Arc<RwLock<Table<K, V>>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<K, V> Clone for InMemorySessionStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, V> InMemorySessionStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                entries: HashMap::new(),
                next_sweep: None,
            })),
            clock,
        }
    }

    /// Returns the number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().map(|guard| guard.entries.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Unavailable`] when the lock is poisoned.
    pub fn purge_expired(&self) -> SessionResult<usize> {
        let now = self.clock.utc();
        let mut table = self.table.write().map_err(lock_error)?;
        Ok(table.purge(now))
    }
}

fn lock_error(err: impl ToString) -> SessionStoreError {
    SessionStoreError::unavailable(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<K, V> SessionStore<K, V> for InMemorySessionStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> SessionResult<Option<V>> {
        let now = self.clock.utc();
        {
            let table = self.table.read().map_err(lock_error)?;
            match table.entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        let mut table = self.table.write().map_err(lock_error)?;
        if table.entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            table.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: K, value: V, ttl: Option<Duration>) -> SessionResult<()> {
        let now = self.clock.utc();
        let expires_at = ttl.map(|ttl| now + ttl);
        let mut table = self.table.write().map_err(lock_error)?;
        table.sweep_if_due(now);
        table.entries.insert(key, Entry { value, expires_at });
        Ok(())
    }

    async fn take(&self, key: &K) -> SessionResult<Option<V>> {
        let now = self.clock.utc();
        let mut table = self.table.write().map_err(lock_error)?;
        let taken = table
            .entries
            .remove(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value);
        table.sweep_if_due(now);
        Ok(taken)
    }

    async fn delete(&self, key: &K) -> SessionResult<bool> {
        let now = self.clock.utc();
        let mut table = self.table.write().map_err(lock_error)?;
        let removed = table
            .entries
            .remove(key)
            .is_some_and(|entry| entry.is_live(now));
        table.sweep_if_due(now);
        Ok(removed)
    }
}
