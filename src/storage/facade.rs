//! Link Service Façade
//!
//! Composes the durable store with the cache engine. The durable store
//! is the source of truth: mutations are applied there first, then
//! mirrored into the cache best-effort. Lookups consult the cache first
//! and fall through to the store on a miss or a cache failure.
//!
//! Cache-side failures surface only as a [`CacheMirror::Degraded`]
//! indicator on an otherwise-successful result, never as a hard error.

use tracing::{debug, warn};

use crate::cache::{CacheError, CacheKey, LinkCache};
use crate::deadline::Deadline;
use crate::error::AppError;
use crate::storage::{DurableStore, LinkRecord, StoreError};

// == Cache Mirror Indicator ==
/// Soft indicator attached to successful results: did the cache layer
/// fully participate in this operation?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMirror {
    /// The cache step completed (or was a clean miss)
    Applied,
    /// The cache step failed or timed out; the durable result stands
    Degraded,
}

impl CacheMirror {
    pub fn is_degraded(&self) -> bool {
        matches!(self, CacheMirror::Degraded)
    }
}

// == Resolved Lookup ==
/// A successful lookup: the target URL plus the cache participation flag.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub url: String,
    pub cache: CacheMirror,
}

fn storage_err(err: StoreError) -> AppError {
    AppError::Storage(err.to_string())
}

// == Link Service ==
/// The four CRUD operations the HTTP layer calls, with the store/cache
/// consistency protocol in between.
pub struct LinkService {
    store: Box<dyn DurableStore>,
    cache: Box<dyn LinkCache>,
}

impl LinkService {
    pub fn new(store: Box<dyn DurableStore>, cache: Box<dyn LinkCache>) -> Self {
        Self { store, cache }
    }

    // == Save ==
    /// Inserts the durable record, then mirrors it into the cache.
    ///
    /// A duplicate `(owner, alias)` is a hard error; a cache failure
    /// after the committed insert only degrades the result.
    pub async fn save(
        &self,
        deadline: Deadline,
        url: &str,
        alias: &str,
        owner: &str,
    ) -> Result<CacheMirror, AppError> {
        let record = LinkRecord::new(owner, alias, url);
        match self.store.insert(deadline, record).await {
            Ok(()) => {}
            Err(StoreError::AliasExists) => return Err(AppError::AliasAlreadyExists),
            Err(err) => return Err(storage_err(err)),
        }

        let key = CacheKey::new(owner, alias);
        match self.cache.set(deadline, key, url.to_string()).await {
            Ok(()) => Ok(CacheMirror::Applied),
            Err(err) => {
                warn!(owner, alias, error = %err, "cache write failed after save");
                Ok(CacheMirror::Degraded)
            }
        }
    }

    // == Lookup ==
    /// Resolves an alias to its target URL, cache first.
    ///
    /// A cache hit answers immediately. A clean miss or a cache failure
    /// falls through to the durable store; on success the cache is
    /// repopulated best-effort. The result is marked degraded only when
    /// the cache step itself failed, not on a clean miss.
    pub async fn lookup(
        &self,
        deadline: Deadline,
        owner: &str,
        alias: &str,
    ) -> Result<Resolved, AppError> {
        let key = CacheKey::new(owner, alias);

        let mut mirror = CacheMirror::Applied;
        match self.cache.get(deadline, &key).await {
            Ok(url) => {
                return Ok(Resolved {
                    url,
                    cache: CacheMirror::Applied,
                })
            }
            Err(CacheError::Miss) => {
                debug!(owner, alias, "cache miss, consulting durable store");
            }
            Err(err) => {
                warn!(owner, alias, error = %err, "cache unavailable, serving from store");
                mirror = CacheMirror::Degraded;
            }
        }

        let record = self
            .store
            .find(deadline, owner, alias)
            .await
            .map_err(storage_err)?
            .ok_or(AppError::AliasNotFound)?;

        // Best-effort repopulation; the outcome does not affect the result.
        if let Err(err) = self.cache.set(deadline, key, record.url.clone()).await {
            debug!(owner, alias, error = %err, "cache repopulation failed");
        }

        Ok(Resolved {
            url: record.url,
            cache: mirror,
        })
    }

    // == Rename ==
    /// Rekeys a durable record, then mirrors the move into the cache.
    pub async fn rename(
        &self,
        deadline: Deadline,
        owner: &str,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<CacheMirror, AppError> {
        let taken = self
            .store
            .find(deadline, owner, new_alias)
            .await
            .map_err(storage_err)?;
        if taken.is_some() {
            return Err(AppError::NewAliasAlreadyExists);
        }

        let rows = match self
            .store
            .update_alias(deadline, owner, old_alias, new_alias)
            .await
        {
            Ok(rows) => rows,
            Err(StoreError::AliasExists) => return Err(AppError::NewAliasAlreadyExists),
            Err(err) => return Err(storage_err(err)),
        };
        if rows == 0 {
            return Err(AppError::AliasNotFound);
        }

        match self
            .cache
            .rename(deadline, owner, old_alias, new_alias)
            .await
        {
            Ok(()) => Ok(CacheMirror::Applied),
            Err(err) => {
                warn!(owner, old_alias, new_alias, error = %err, "cache rename failed");
                Ok(CacheMirror::Degraded)
            }
        }
    }

    // == Delete ==
    /// Deletes the durable record, then invalidates the cache entry.
    pub async fn delete(
        &self,
        deadline: Deadline,
        owner: &str,
        alias: &str,
    ) -> Result<CacheMirror, AppError> {
        let rows = self
            .store
            .delete_one(deadline, owner, alias)
            .await
            .map_err(storage_err)?;
        if rows == 0 {
            return Err(AppError::AliasNotFound);
        }

        let key = CacheKey::new(owner, alias);
        match self.cache.delete(deadline, &key).await {
            Ok(()) => Ok(CacheMirror::Applied),
            Err(err) => {
                warn!(owner, alias, error = %err, "cache invalidation failed");
                Ok(CacheMirror::Degraded)
            }
        }
    }

    // == Close ==
    /// Closes the cache and the store, combining errors when both fail.
    pub async fn close(&self) -> Result<(), AppError> {
        let cache_err = self.cache.close().await.err();
        let store_err = self.store.close().await.err();

        match (cache_err, store_err) {
            (None, None) => Ok(()),
            (Some(c), None) => Err(AppError::Storage(c.to_string())),
            (None, Some(s)) => Err(AppError::Storage(s.to_string())),
            (Some(c), Some(s)) => Err(AppError::Storage(format!("{c} && {s}"))),
        }
    }
}
