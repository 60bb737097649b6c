//! SQLite Durable Store
//!
//! [`DurableStore`] backed by a local SQLite database. One row per link,
//! unique on `(owner, alias)`.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::deadline::Deadline;
use crate::storage::{DurableStore, LinkRecord, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS links (
    owner TEXT NOT NULL,
    alias TEXT NOT NULL,
    url   TEXT NOT NULL,
    PRIMARY KEY (owner, alias)
);
";

fn store_err(err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::AliasExists
        }
        other => StoreError::Backend(other.to_string()),
    }
}

// == Sqlite Store ==
/// SQLite-backed store of record.
///
/// Queries are short point lookups on the primary key; the connection is
/// serialized behind an async mutex. The deadline is checked before each
/// query since a running SQLite statement cannot be interrupted mid-way.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(store_err)?;
        Self::init(conn)
    }

    /// Opens a private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(store_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl DurableStore for SqliteStore {
    async fn find(
        &self,
        deadline: Deadline,
        owner: &str,
        alias: &str,
    ) -> Result<Option<LinkRecord>, StoreError> {
        if deadline.is_elapsed() {
            return Err(StoreError::Timeout);
        }

        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT owner, alias, url FROM links WHERE owner = ?1 AND alias = ?2",
            params![owner, alias],
            |row| {
                Ok(LinkRecord {
                    owner: row.get(0)?,
                    alias: row.get(1)?,
                    url: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(store_err)
    }

    async fn insert(&self, deadline: Deadline, record: LinkRecord) -> Result<(), StoreError> {
        if deadline.is_elapsed() {
            return Err(StoreError::Timeout);
        }

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO links (owner, alias, url) VALUES (?1, ?2, ?3)",
            params![record.owner, record.alias, record.url],
        )
        .map_err(store_err)?;
        Ok(())
    }

    async fn delete_one(
        &self,
        deadline: Deadline,
        owner: &str,
        alias: &str,
    ) -> Result<u64, StoreError> {
        if deadline.is_elapsed() {
            return Err(StoreError::Timeout);
        }

        let conn = self.conn.lock().await;
        let rows = conn
            .execute(
                "DELETE FROM links WHERE owner = ?1 AND alias = ?2",
                params![owner, alias],
            )
            .map_err(store_err)?;
        Ok(rows as u64)
    }

    async fn update_alias(
        &self,
        deadline: Deadline,
        owner: &str,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<u64, StoreError> {
        if deadline.is_elapsed() {
            return Err(StoreError::Timeout);
        }

        let conn = self.conn.lock().await;
        let rows = conn
            .execute(
                "UPDATE links SET alias = ?1 WHERE owner = ?2 AND alias = ?3",
                params![new_alias, owner, old_alias],
            )
            .map_err(store_err)?;
        Ok(rows as u64)
    }

    async fn close(&self) -> Result<(), StoreError> {
        // The connection is closed when the store is dropped.
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert(deadline(), LinkRecord::new("u", "a1", "https://example.com"))
            .await
            .unwrap();

        let found = store.find(deadline(), "u", "a1").await.unwrap().unwrap();
        assert_eq!(found.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = SqliteStore::open_in_memory().unwrap();

        let found = store.find(deadline(), "u", "ghost").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_conflicts() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert(deadline(), LinkRecord::new("u", "a1", "https://one.example"))
            .await
            .unwrap();
        let result = store
            .insert(deadline(), LinkRecord::new("u", "a1", "https://two.example"))
            .await;

        assert!(matches!(result, Err(StoreError::AliasExists)));
    }

    #[tokio::test]
    async fn test_same_alias_different_owners() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert(deadline(), LinkRecord::new("alice", "a", "https://a.example"))
            .await
            .unwrap();
        store
            .insert(deadline(), LinkRecord::new("bob", "a", "https://b.example"))
            .await
            .unwrap();

        let alice = store.find(deadline(), "alice", "a").await.unwrap().unwrap();
        assert_eq!(alice.url, "https://a.example");
    }

    #[tokio::test]
    async fn test_delete_one_reports_rows() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert(deadline(), LinkRecord::new("u", "a1", "https://example.com"))
            .await
            .unwrap();

        assert_eq!(store.delete_one(deadline(), "u", "a1").await.unwrap(), 1);
        assert_eq!(store.delete_one(deadline(), "u", "a1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_alias_moves_row() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert(deadline(), LinkRecord::new("u", "old", "https://example.com"))
            .await
            .unwrap();

        let rows = store
            .update_alias(deadline(), "u", "old", "new")
            .await
            .unwrap();
        assert_eq!(rows, 1);

        assert!(store.find(deadline(), "u", "old").await.unwrap().is_none());
        let moved = store.find(deadline(), "u", "new").await.unwrap().unwrap();
        assert_eq!(moved.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_update_alias_missing_row() {
        let store = SqliteStore::open_in_memory().unwrap();

        let rows = store
            .update_alias(deadline(), "u", "ghost", "new")
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_update_alias_collision_conflicts() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert(deadline(), LinkRecord::new("u", "a", "https://a.example"))
            .await
            .unwrap();
        store
            .insert(deadline(), LinkRecord::new("u", "b", "https://b.example"))
            .await
            .unwrap();

        let result = store.update_alias(deadline(), "u", "a", "b").await;
        assert!(matches!(result, Err(StoreError::AliasExists)));
    }

    #[tokio::test]
    async fn test_expired_deadline_times_out() {
        let store = SqliteStore::open_in_memory().unwrap();

        let result = store.find(Deadline::expired(), "u", "a").await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }
}
