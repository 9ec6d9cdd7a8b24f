//! # Star Registry
//!
//! A single-writer ledger of star ownership claims. Each registration is a
//! block, hash-linked to the one before it, and an address may only register
//! after proving it holds its private key.
//!
//! ## Overview
//!
//! - **Ledger**: append-only blocks over a [`Store`](store::Store), genesis
//!   at height 0, lookups by height, address and hash
//! - **Verifier**: recomputes every digest and checks every link
//! - **Validation window**: time-boxed signed challenges and single-use grants
//! - **Registry**: the request → validate → register flow over both
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use star_registry::{Registry, RegistryConfig};
//! use star_registry::core::{Ed25519Verifier, Keypair, StarInput, StarRegistration};
//! use star_registry::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("registry.db").unwrap();
//!     let registry = Registry::open(store, Arc::new(Ed25519Verifier), RegistryConfig::default())
//!         .await
//!         .unwrap();
//!
//!     let keypair = Keypair::generate();
//!     let address = keypair.address().to_hex();
//!
//!     let ticket = registry.request_validation(&address).unwrap();
//!     registry
//!         .validate_signature(&address, &keypair.sign_message(&ticket.message))
//!         .unwrap();
//!
//!     let star = StarInput::new("16h 29m 1.0s", "-26° 29' 24.9", "Found star");
//!     let block = registry
//!         .register_star(&StarRegistration::new(address, star))
//!         .await
//!         .unwrap();
//!     assert_eq!(block.body.star.story_decoded, "Found star");
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `star_registry::core` - Blocks, star records, keys and digests
//! - `star_registry::store` - Storage abstraction and SQLite
//! - `star_registry::validation` - Tickets and grants

pub mod config;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod verify;

pub use star_registry_core as core;
pub use star_registry_store as store;
pub use star_registry_validation as validation;

pub use config::{GenesisConfig, RegistryConfig};
pub use error::{ErrorKind, RegistryError, Result};
pub use ledger::Ledger;
pub use registry::Registry;
pub use verify::ChainReport;

pub use star_registry_core::{Block, BlockView, StarInput, StarRecord, StarRegistration};
pub use star_registry_validation::{ValidatedGrant, ValidationTicket};
