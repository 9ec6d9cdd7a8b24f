//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Records keyed by height. The map length is the block count.
    records: RwLock<BTreeMap<u64, Bytes>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<u64, Bytes>>> {
        self.records
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<u64, Bytes>>> {
        self.records
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, height: u64) -> Result<Option<Bytes>> {
        Ok(self.read()?.get(&height).cloned())
    }

    async fn put(&self, height: u64, value: Bytes) -> Result<()> {
        self.write()?.insert(height, value);
        Ok(())
    }

    async fn insert(&self, height: u64, value: Bytes) -> Result<InsertResult> {
        let mut records = self.write()?;

        if let Some(existing) = records.get(&height) {
            if *existing == value {
                return Ok(InsertResult::AlreadyExists);
            }
            return Ok(InsertResult::Conflict {
                existing: existing.clone(),
            });
        }

        records.insert(height, value);
        Ok(InsertResult::Inserted)
    }

    async fn scan_keys(&self) -> Result<Vec<u64>> {
        Ok(self.read()?.keys().copied().collect())
    }

    async fn scan_values(&self) -> Result<Vec<Bytes>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn height(&self) -> Result<u64> {
        Ok(self.read()?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        assert_eq!(store.height().await.unwrap(), 0);

        let result = store.insert(0, Bytes::from_static(b"genesis")).await.unwrap();
        assert_eq!(result, InsertResult::Inserted);

        let retrieved = store.get(0).await.unwrap().unwrap();
        assert_eq!(retrieved.as_ref(), b"genesis");
        assert_eq!(store.height().await.unwrap(), 1);
        assert_eq!(store.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_idempotent_and_conflict() {
        let store = MemoryStore::new();
        store.insert(0, Bytes::from_static(b"a")).await.unwrap();

        let again = store.insert(0, Bytes::from_static(b"a")).await.unwrap();
        assert_eq!(again, InsertResult::AlreadyExists);

        let other = store.insert(0, Bytes::from_static(b"b")).await.unwrap();
        assert_eq!(
            other,
            InsertResult::Conflict {
                existing: Bytes::from_static(b"a")
            }
        );
        assert_eq!(store.get(0).await.unwrap().unwrap().as_ref(), b"a");
        assert_eq!(store.height().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_overwrites_without_recounting() {
        let store = MemoryStore::new();
        store.insert(0, Bytes::from_static(b"a")).await.unwrap();
        store.put(0, Bytes::from_static(b"corrupt")).await.unwrap();

        assert_eq!(store.get(0).await.unwrap().unwrap().as_ref(), b"corrupt");
        assert_eq!(store.height().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scans_are_ordered() {
        let store = MemoryStore::new();
        for height in [2u64, 0, 1] {
            store
                .insert(height, Bytes::from(format!("v{}", height)))
                .await
                .unwrap();
        }

        assert_eq!(store.scan_keys().await.unwrap(), vec![0, 1, 2]);
        let values: Vec<_> = store.scan_values().await.unwrap();
        assert_eq!(values[0].as_ref(), b"v0");
        assert_eq!(values[2].as_ref(), b"v2");
    }
}
