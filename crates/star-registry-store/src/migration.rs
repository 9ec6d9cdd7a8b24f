//! SQLite schema versions.
//!
//! `schema_migrations` records every applied version. Opening a database runs
//! whatever versions are missing, in order, inside one transaction.

use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Key of the block counter row in `chain_meta`.
pub const BLOCK_COUNT_KEY: &str = "block_count";

/// Bring the schema up to [`CURRENT_VERSION`]. A no-op on an up-to-date
/// database.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_secs()],
            )?;
            info!(version, "applied schema migration");
        }

        tx.commit()?;
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// v1: the block table and its counter.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One serialized block per height
        CREATE TABLE blocks (
            height INTEGER PRIMARY KEY,       -- zero-based block height
            payload BLOB NOT NULL,            -- canonical block bytes
            stored_at INTEGER NOT NULL        -- local write time (unix seconds)
        );

        -- Counters kept in step with the blocks table
        CREATE TABLE chain_meta (
            key TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );

        INSERT INTO chain_meta (key, value) VALUES ('block_count', 0);
        "#,
    )?;

    Ok(())
}

fn now_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
