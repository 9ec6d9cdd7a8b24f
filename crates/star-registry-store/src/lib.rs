//! # Star Registry Store
//!
//! Storage abstraction for the Star Registry ledger. Provides a trait-based
//! interface over height-keyed block records with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The ledger only needs a handful of primitives from its key-value store:
//! point reads and writes keyed by block height, ordered scans, and a block
//! counter. The [`Store`] trait captures exactly that, so the ledger stays
//! storage-agnostic. Values are opaque serialized blocks; the store never
//! interprets them.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertResult`] - Result of a conflict-checked insert
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use star_registry_store::{InsertResult, SqliteStore, Store};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("chain.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let result = store.insert(0, Bytes::from_static(b"{}")).await.unwrap();
//!     assert_eq!(result, InsertResult::Inserted);
//!     assert_eq!(store.height().await.unwrap(), 1);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Insert never overwrites**: a different value at an occupied height is
//!   reported as `Conflict`; the same value is `AlreadyExists`.
//! - **Counted, not scanned**: the block count is kept alongside the records
//!   and updated in the same write, so `height()` is O(1).
//! - **Raw put**: `put` overwrites unconditionally. The ledger never calls it;
//!   it exists for repair tooling and for tests that corrupt records.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, Store};
