//! In-Memory Cache Backend
//!
//! The default cache engine: a capacity-bounded map with least-used
//! eviction, its state behind a single async mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use crate::cache::{CacheError, CacheKey, LinkCache, UsageTracker};
use crate::deadline::Deadline;

// == Cache State ==
/// The engine's shared mutable state: the entry table and the usage
/// counters, guarded together so no operation observes a half-applied
/// eviction or insertion.
#[derive(Debug)]
pub(crate) struct CacheState {
    /// Key to target URL
    entries: HashMap<CacheKey, String>,
    /// Access counters driving eviction
    usage: UsageTracker,
    /// Maximum number of resident entries
    capacity: usize,
}

impl CacheState {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            usage: UsageTracker::new(),
            // Capacity must stay positive for the eviction invariant to hold.
            capacity: capacity.max(1),
        }
    }

    /// Stores or overwrites an entry, evicting the least-used key first
    /// when a new key would exceed capacity.
    pub(crate) fn insert(&mut self, key: CacheKey, url: String) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key.clone(), url);
            self.usage.touch(&key);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(victim) = self.usage.victim() {
                debug!(
                    owner = %victim.owner,
                    alias = %victim.alias,
                    usage = self.usage.count(&victim),
                    "evicting least-used cache entry"
                );
                self.entries.remove(&victim);
                self.usage.forget(&victim);
            }
        }

        self.entries.insert(key.clone(), url);
        self.usage.touch(&key);
    }

    /// Returns the cached URL for a key, counting the access on a hit.
    pub(crate) fn lookup(&mut self, key: &CacheKey) -> Option<String> {
        let url = self.entries.get(key).cloned()?;
        self.usage.touch(key);
        Some(url)
    }

    /// Moves an entry and its accumulated usage to a new alias,
    /// overwriting any entry already at the target. Missing source is a
    /// no-op.
    pub(crate) fn rename(&mut self, owner: &str, old_alias: &str, new_alias: &str) {
        let old = CacheKey::new(owner, old_alias);
        let Some(url) = self.entries.remove(&old) else {
            return;
        };
        let new = CacheKey::new(owner, new_alias);
        self.entries.insert(new.clone(), url);
        self.usage.transfer(&old, new);
    }

    /// Removes an entry and its counter; absence is not an error.
    pub(crate) fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        self.usage.forget(key);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    #[cfg(test)]
    pub(crate) fn usage_of(&self, key: &CacheKey) -> u64 {
        self.usage.count(key)
    }
}

// == Memory Cache ==
/// In-memory [`LinkCache`] backend.
///
/// Each operation is submitted as an independent task racing the caller's
/// deadline. When the deadline fires first the caller gets
/// [`CacheError::Timeout`], but the submitted task is not cancelled: it
/// still acquires the lock and applies its mutation, which later callers
/// will observe. At-most-once mutation, no rollback.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    state: Arc<Mutex<CacheState>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::new(capacity))),
        }
    }

    /// Current number of resident entries.
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    /// Waits for either the submitted work or the deadline, whichever
    /// comes first. The work keeps running if the deadline wins.
    async fn race<T>(deadline: Deadline, task: JoinHandle<T>) -> Result<T, CacheError>
    where
        T: Send + 'static,
    {
        match time::timeout_at(deadline.instant(), task).await {
            Ok(joined) => joined.map_err(|err| CacheError::Backend(err.to_string())),
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

#[async_trait]
impl LinkCache for MemoryCache {
    async fn set(&self, deadline: Deadline, key: CacheKey, url: String) -> Result<(), CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            state.lock().await.insert(key, url);
        });

        Self::race(deadline, task).await
    }

    async fn get(&self, deadline: Deadline, key: &CacheKey) -> Result<String, CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let state = Arc::clone(&self.state);
        let key = key.clone();
        let task = tokio::spawn(async move {
            state.lock().await.lookup(&key).ok_or(CacheError::Miss)
        });

        Self::race(deadline, task).await?
    }

    async fn rename(
        &self,
        deadline: Deadline,
        owner: &str,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<(), CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let state = Arc::clone(&self.state);
        let owner = owner.to_string();
        let old_alias = old_alias.to_string();
        let new_alias = new_alias.to_string();
        let task = tokio::spawn(async move {
            state.lock().await.rename(&owner, &old_alias, &new_alias);
        });

        Self::race(deadline, task).await
    }

    async fn delete(&self, deadline: Deadline, key: &CacheKey) -> Result<(), CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let state = Arc::clone(&self.state);
        let key = key.clone();
        let task = tokio::spawn(async move {
            state.lock().await.remove(&key);
        });

        Self::race(deadline, task).await
    }

    async fn close(&self) -> Result<(), CacheError> {
        // No held resources; entries are simply dropped with the process.
        Ok(())
    }
}
