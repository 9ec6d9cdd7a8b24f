//! # Star Registry Core
//!
//! Pure primitives for the Star Registry: blocks, star records, digests and
//! signatures.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the ledger's data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - A hash-linked ledger entry carrying one star registration
//! - [`StarRecord`] - The persisted star description (story hex-encoded)
//! - [`BlockView`] - The outbound form of a block, with the story decoded
//! - [`StarRegistration`] - Controller-supplied registration input
//! - [`SignatureVerifier`] - Capability that checks a signed challenge
//! - [`Clock`] - Source of unix-second timestamps
//!
//! ## Canonicalization
//!
//! Blocks are serialized as compact JSON with a fixed field order. The same
//! bytes are persisted and hashed. See [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod registration;
pub mod star;

pub use block::{Block, BlockBody, BlockView, BodyView, GENESIS_HEIGHT};
pub use canonical::{block_digest, canonical_bytes, decode_block};
pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{Address, Ed25519Verifier, Keypair, Sha256Hash, SignatureVerifier};
pub use error::{CoreError, InputError};
pub use registration::{StarInput, StarRegistration, DEFAULT_MAX_STORY_BYTES};
pub use star::{StarRecord, StarView};
