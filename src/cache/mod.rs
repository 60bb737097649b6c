//! Cache Module
//!
//! Bounded lookup cache in front of the durable link store, with
//! least-used eviction and per-operation deadlines.
//!
//! Three backends implement the [`LinkCache`] trait and are selected at
//! construction time: an in-memory map ([`MemoryCache`]), a Redis-backed
//! variant ([`RedisCache`]), and a disabled variant ([`NoopCache`]).

mod memory;
mod noop;
mod redis;
mod usage;


// Re-export public types
pub use memory::MemoryCache;
pub use noop::NoopCache;
pub use redis::RedisCache;
pub use usage::UsageTracker;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deadline::Deadline;

// == Cache Key ==
/// Compound cache key: the owner namespace plus the short alias.
///
/// Two owners may use the same alias independently. A single-tenant
/// deployment fixes `owner` to the empty string. `Ord` is derived so that
/// eviction tie-breaking is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub owner: String,
    pub alias: String,
}

impl CacheKey {
    /// Creates a key scoped to an owner namespace.
    pub fn new(owner: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            alias: alias.into(),
        }
    }

    /// Creates a key in the global (single-tenant) namespace.
    pub fn global(alias: impl Into<String>) -> Self {
        Self::new("", alias)
    }
}

// == Cache Error Enum ==
/// Errors produced by cache backends.
///
/// None of these are escalated past the store façade: a `Miss` falls
/// through to the durable store, and `Timeout`/`Backend` become a soft
/// degradation indicator on the result.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key is not cached; authoritative answer lives in the store
    #[error("key not cached")]
    Miss,

    /// The caller's deadline elapsed before the operation completed
    #[error("cache deadline exceeded")]
    Timeout,

    /// The cache backend itself failed
    #[error("cache backend error: {0}")]
    Backend(String),
}

// == Link Cache Trait ==
/// Capability interface over cache backends.
///
/// Every operation races the caller-supplied deadline; a `Timeout` result
/// means only that the caller stopped waiting. The submitted work may
/// still complete and mutate backend state afterwards.
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Stores or overwrites the target URL for a key, evicting the
    /// least-used entry first when a new key would exceed capacity.
    async fn set(&self, deadline: Deadline, key: CacheKey, url: String) -> Result<(), CacheError>;

    /// Returns the cached target URL, counting the access.
    async fn get(&self, deadline: Deadline, key: &CacheKey) -> Result<String, CacheError>;

    /// Moves an entry (and its accumulated usage) to a new alias within
    /// the same owner namespace. A missing source entry is a no-op.
    async fn rename(
        &self,
        deadline: Deadline,
        owner: &str,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<(), CacheError>;

    /// Removes the entry if present; absence is not an error.
    async fn delete(&self, deadline: Deadline, key: &CacheKey) -> Result<(), CacheError>;

    /// Releases backend resources. Idempotent.
    async fn close(&self) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_global_namespace() {
        let key = CacheKey::global("promo");
        assert_eq!(key.owner, "");
        assert_eq!(key.alias, "promo");
    }

    #[test]
    fn test_cache_key_owner_isolation() {
        let a = CacheKey::new("alice", "promo");
        let b = CacheKey::new("bob", "promo");
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_ordering_owner_then_alias() {
        let mut keys = vec![
            CacheKey::new("bob", "a"),
            CacheKey::new("alice", "z"),
            CacheKey::new("alice", "a"),
        ];
        keys.sort();
        assert_eq!(keys[0], CacheKey::new("alice", "a"));
        assert_eq!(keys[1], CacheKey::new("alice", "z"));
        assert_eq!(keys[2], CacheKey::new("bob", "a"));
    }
}
