//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for the ledger. It uses rusqlite
//! with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::migration::{self, BLOCK_COUNT_KEY};
use crate::traits::{InsertResult, Store};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn select_payload(tx: &Transaction<'_>, height: u64) -> rusqlite::Result<Option<Vec<u8>>> {
    tx.query_row(
        "SELECT payload FROM blocks WHERE height = ?1",
        params![height as i64],
        |row| row.get(0),
    )
    .optional()
}

fn bump_block_count(tx: &Transaction<'_>) -> rusqlite::Result<usize> {
    tx.execute(
        "UPDATE chain_meta SET value = value + 1 WHERE key = ?1",
        params![BLOCK_COUNT_KEY],
    )
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, height: u64) -> Result<Option<Bytes>> {
        self.with_conn(move |conn| {
            let payload: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT payload FROM blocks WHERE height = ?1",
                    params![height as i64],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(payload.map(Bytes::from))
        })
        .await
    }

    async fn put(&self, height: u64, value: Bytes) -> Result<()> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let existed = select_payload(&tx, height)?.is_some();

            tx.execute(
                "INSERT INTO blocks (height, payload, stored_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(height) DO UPDATE SET
                    payload = excluded.payload,
                    stored_at = excluded.stored_at",
                params![height as i64, value.as_ref(), now_secs()],
            )?;

            if !existed {
                bump_block_count(&tx)?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn insert(&self, height: u64, value: Bytes) -> Result<InsertResult> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            if let Some(existing) = select_payload(&tx, height)? {
                return Ok(if existing.as_slice() == value.as_ref() {
                    InsertResult::AlreadyExists
                } else {
                    InsertResult::Conflict {
                        existing: Bytes::from(existing),
                    }
                });
            }

            tx.execute(
                "INSERT INTO blocks (height, payload, stored_at) VALUES (?1, ?2, ?3)",
                params![height as i64, value.as_ref(), now_secs()],
            )?;
            bump_block_count(&tx)?;

            tx.commit()?;
            Ok(InsertResult::Inserted)
        })
        .await
    }

    async fn scan_keys(&self) -> Result<Vec<u64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT height FROM blocks ORDER BY height")?;
            let keys = stmt
                .query_map([], |row| row.get::<_, i64>(0).map(|v| v as u64))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(keys)
        })
        .await
    }

    async fn scan_values(&self) -> Result<Vec<Bytes>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT payload FROM blocks ORDER BY height")?;
            let values = stmt
                .query_map([], |row| row.get::<_, Vec<u8>>(0).map(Bytes::from))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(values)
        })
        .await
    }

    async fn height(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT value FROM chain_meta WHERE key = ?1",
                params![BLOCK_COUNT_KEY],
                |row| row.get(0),
            )?;
            u64::try_from(count)
                .map_err(|_| StoreError::InvalidData(format!("negative block count {}", count)))
        })
        .await
    }
}

fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
