//! Store trait: the abstract interface for block persistence.
//!
//! This trait allows the ledger to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Result of a conflict-checked insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// The record was written.
    Inserted,
    /// The exact same record is already stored (idempotent - not an error).
    AlreadyExists,
    /// A different record already occupies this height.
    Conflict {
        /// The record currently stored at this height.
        existing: Bytes,
    },
}

/// The Store trait: async interface for height-keyed block records.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the
/// runtime.
///
/// Keys are block heights; values are opaque serialized blocks.
#[async_trait]
pub trait Store: Send + Sync {
    /// Get the record stored at `height`.
    async fn get(&self, height: u64) -> Result<Option<Bytes>>;

    /// Write `value` at `height`, replacing whatever is there.
    ///
    /// The block count only changes when the height was previously empty.
    async fn put(&self, height: u64, value: Bytes) -> Result<()>;

    /// Write `value` at `height` unless the height is occupied.
    ///
    /// # Returns
    /// - `Inserted` if the height was empty.
    /// - `AlreadyExists` if the identical value is already there.
    /// - `Conflict` if a different value is there; nothing is written.
    async fn insert(&self, height: u64, value: Bytes) -> Result<InsertResult>;

    /// All stored heights, ascending.
    async fn scan_keys(&self) -> Result<Vec<u64>>;

    /// All stored records, ordered by ascending height.
    async fn scan_values(&self) -> Result<Vec<Bytes>>;

    /// Number of stored records.
    ///
    /// Maintained together with every write; never a full scan.
    async fn height(&self) -> Result<u64>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn get(&self, height: u64) -> Result<Option<Bytes>> {
        (**self).get(height).await
    }

    async fn put(&self, height: u64, value: Bytes) -> Result<()> {
        (**self).put(height, value).await
    }

    async fn insert(&self, height: u64, value: Bytes) -> Result<InsertResult> {
        (**self).insert(height, value).await
    }

    async fn scan_keys(&self) -> Result<Vec<u64>> {
        (**self).scan_keys().await
    }

    async fn scan_values(&self) -> Result<Vec<Bytes>> {
        (**self).scan_values().await
    }

    async fn height(&self) -> Result<u64> {
        (**self).height().await
    }
}
