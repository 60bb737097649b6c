//! Storage Module
//!
//! The durable store of record for short links, and the façade composing
//! it with the cache engine.
//!
//! The durable store is always the authority: mutations land there first,
//! and the cache mirror afterwards is best-effort. A cache-side failure
//! can never roll back or block a durable result.

mod facade;
mod sqlite;

// Re-export public types
pub use facade::{CacheMirror, LinkService, Resolved};
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::deadline::Deadline;

// == Defaults ==
/// Cache capacity used when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 30;

// == Link Record ==
/// The authoritative durable row: a target URL keyed by `(owner, alias)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub owner: String,
    pub alias: String,
    pub url: String,
}

impl LinkRecord {
    pub fn new(
        owner: impl Into<String>,
        alias: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            alias: alias.into(),
            url: url.into(),
        }
    }
}

// == Store Error Enum ==
/// Errors produced by durable store backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique constraint on `(owner, alias)` violated
    #[error("alias already exists")]
    AliasExists,

    /// The caller's deadline was already spent before the query ran
    #[error("durable store deadline exceeded")]
    Timeout,

    /// Store unreachable or returned a malformed response
    #[error("durable store error: {0}")]
    Backend(String),
}

// == Durable Store Trait ==
/// The interface the façade consumes from the store of record.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Returns the record at `(owner, alias)` if one exists.
    async fn find(
        &self,
        deadline: Deadline,
        owner: &str,
        alias: &str,
    ) -> Result<Option<LinkRecord>, StoreError>;

    /// Inserts a record; a duplicate `(owner, alias)` yields
    /// [`StoreError::AliasExists`].
    async fn insert(&self, deadline: Deadline, record: LinkRecord) -> Result<(), StoreError>;

    /// Deletes the record at `(owner, alias)`, returning the number of
    /// rows affected.
    async fn delete_one(
        &self,
        deadline: Deadline,
        owner: &str,
        alias: &str,
    ) -> Result<u64, StoreError>;

    /// Rekeys a record from `old_alias` to `new_alias` within the owner's
    /// namespace, returning the number of rows affected.
    async fn update_alias(
        &self,
        deadline: Deadline,
        owner: &str,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<u64, StoreError>;

    /// Releases held resources. Idempotent.
    async fn close(&self) -> Result<(), StoreError>;
}
