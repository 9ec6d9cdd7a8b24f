//! # Star Registry Testkit
//!
//! Testing utilities for the Star Registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: claimants with deterministic keys, a manual clock, and a
//!   registry over an in-memory store
//! - **Generators**: Proptest strategies for stars and blocks
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use star_registry_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn block_hash_is_deterministic(params: BlockParams) {
//!         let b1 = block_from_params(&params);
//!         let b2 = block_from_params(&params);
//!         prop_assert_eq!(b1.hash, b2.hash);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use star_registry_testkit::TestFixture;
//!
//! let fixture = TestFixture::with_seed([1u8; 32]);
//! let registry = fixture.registry().await?;
//! fixture.validate(&registry)?;
//! registry.register_star(&fixture.registration("a story")).await?;
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_fixtures, sample_star, TestFixture, FIXTURE_EPOCH};
pub use generators::{block_from_params, BlockParams};
