//! Redis Cache Backend
//!
//! [`LinkCache`] backend delegating entry storage to an external Redis
//! service. Occupancy is Redis's DBSIZE; the usage counters driving
//! eviction are process-local and reset on restart, like the in-memory
//! backend's.
//!
//! Keys are the JSON encoding of [`CacheKey`], values the target URL.

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

use crate::cache::{CacheError, CacheKey, LinkCache, UsageTracker};
use crate::deadline::Deadline;

fn backend(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

fn encode_key(key: &CacheKey) -> Result<String, CacheError> {
    serde_json::to_string(key).map_err(|err| CacheError::Backend(err.to_string()))
}

// == Redis Cache ==
/// Redis-backed [`LinkCache`].
///
/// The multiplexed connection is safe for concurrent use by its own
/// contract; the usage table is the only other shared state, and holding
/// its lock across each operation serializes eviction decisions. As with
/// the in-memory backend, a deadline that fires first aborts only the
/// caller's wait, not the submitted Redis commands.
#[derive(Clone)]
pub struct RedisCache {
    conn: MultiplexedConnection,
    usage: Arc<Mutex<UsageTracker>>,
    capacity: usize,
}

impl RedisCache {
    /// Connects to the Redis service at `url`.
    pub async fn connect(url: &str, capacity: usize) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend)?;

        Ok(Self {
            conn,
            usage: Arc::new(Mutex::new(UsageTracker::new())),
            capacity: capacity.max(1),
        })
    }

    async fn race<T>(deadline: Deadline, task: JoinHandle<Result<T, CacheError>>) -> Result<T, CacheError>
    where
        T: Send + 'static,
    {
        match time::timeout_at(deadline.instant(), task).await {
            Ok(joined) => joined.map_err(|err| CacheError::Backend(err.to_string()))?,
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

#[async_trait]
impl LinkCache for RedisCache {
    async fn set(&self, deadline: Deadline, key: CacheKey, url: String) -> Result<(), CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let mut conn = self.conn.clone();
        let usage = Arc::clone(&self.usage);
        let capacity = self.capacity;
        let task = tokio::spawn(async move {
            let field = encode_key(&key)?;
            let mut usage = usage.lock().await;

            let existing: Option<String> = conn.get(&field).await.map_err(backend)?;
            if existing.is_some() {
                let _: () = conn.set(&field, &url).await.map_err(backend)?;
                usage.touch(&key);
                return Ok(());
            }

            let size: i64 = redis::cmd("DBSIZE")
                .query_async(&mut conn)
                .await
                .map_err(backend)?;
            if size >= capacity as i64 {
                if let Some(victim) = usage.victim() {
                    debug!(
                        owner = %victim.owner,
                        alias = %victim.alias,
                        "evicting least-used cache entry from redis"
                    );
                    let victim_field = encode_key(&victim)?;
                    let _: i64 = conn.del(&victim_field).await.map_err(backend)?;
                    usage.forget(&victim);
                }
            }

            let _: () = conn.set(&field, &url).await.map_err(backend)?;
            usage.touch(&key);
            Ok(())
        });

        Self::race(deadline, task).await
    }

    async fn get(&self, deadline: Deadline, key: &CacheKey) -> Result<String, CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let mut conn = self.conn.clone();
        let usage = Arc::clone(&self.usage);
        let key = key.clone();
        let task = tokio::spawn(async move {
            let field = encode_key(&key)?;
            let mut usage = usage.lock().await;

            let value: Option<String> = conn.get(&field).await.map_err(backend)?;
            match value {
                Some(url) => {
                    usage.touch(&key);
                    Ok(url)
                }
                None => Err(CacheError::Miss),
            }
        });

        Self::race(deadline, task).await
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

        let mut conn = self.conn.clone();
        let usage = Arc::clone(&self.usage);
        let old = CacheKey::new(owner, old_alias);
        let new = CacheKey::new(owner, new_alias);
        let task = tokio::spawn(async move {
            let old_field = encode_key(&old)?;
            let new_field = encode_key(&new)?;
            let mut usage = usage.lock().await;

            let renamed: Result<(), redis::RedisError> = redis::cmd("RENAME")
                .arg(&old_field)
                .arg(&new_field)
                .query_async(&mut conn)
                .await;
            match renamed {
                Ok(()) => {
                    usage.transfer(&old, new);
                    Ok(())
                }
                // RENAME answers an error when the source key does not
                // exist; that is the no-op case, not a backend failure.
                Err(err) if err.kind() == redis::ErrorKind::ResponseError => Ok(()),
                Err(err) => Err(backend(err)),
            }
        });

        Self::race(deadline, task).await
    }

    async fn delete(&self, deadline: Deadline, key: &CacheKey) -> Result<(), CacheError> {
        if deadline.is_elapsed() {
            return Err(CacheError::Timeout);
        }

        let mut conn = self.conn.clone();
        let usage = Arc::clone(&self.usage);
        let key = key.clone();
        let task = tokio::spawn(async move {
            let field = encode_key(&key)?;
            let mut usage = usage.lock().await;

            let _: i64 = conn.del(&field).await.map_err(backend)?;
            usage.forget(&key);
            Ok(())
        });

        Self::race(deadline, task).await
    }

    async fn close(&self) -> Result<(), CacheError> {
        // The multiplexed connection is torn down when the last clone is
        // dropped; nothing to flush.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encoding_is_stable() {
        let key = CacheKey::new("alice", "promo");
        let field = encode_key(&key).unwrap();
        assert_eq!(field, r#"{"owner":"alice","alias":"promo"}"#);

        let decoded: CacheKey = serde_json::from_str(&field).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_distinct_owners_encode_to_distinct_fields() {
        let a = encode_key(&CacheKey::new("alice", "a")).unwrap();
        let b = encode_key(&CacheKey::new("bob", "a")).unwrap();
        assert_ne!(a, b);
    }
}
