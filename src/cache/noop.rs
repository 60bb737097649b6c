//! Disabled Cache Backend
//!
//! Used when the deployment turns the cache off: every lookup is a miss
//! and every mutation succeeds without storing anything, so the façade
//! always falls through to the durable store.

use async_trait::async_trait;

use crate::cache::{CacheError, CacheKey, LinkCache};
use crate::deadline::Deadline;

// == Noop Cache ==
/// [`LinkCache`] backend that caches nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopCache;

impl NoopCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LinkCache for NoopCache {
    async fn set(&self, _: Deadline, _: CacheKey, _: String) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, _: Deadline, _: &CacheKey) -> Result<String, CacheError> {
        Err(CacheError::Miss)
    }

    async fn rename(&self, _: Deadline, _: &str, _: &str, _: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _: Deadline, _: &CacheKey) -> Result<(), CacheError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
