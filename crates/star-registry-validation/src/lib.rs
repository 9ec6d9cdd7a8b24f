//! # Star Registry Validation
//!
//! The proof-of-identity window that gates star registration.
//!
//! ## Overview
//!
//! Before a block can be appended for an address, the claimant must prove
//! they hold the address's private key:
//!
//! 1. **Request**: the claimant asks for a [`ValidationTicket`]. It carries a
//!    challenge message `"<address>:<timestamp>:starRegistry"` and is live for
//!    a fixed window (300 seconds by default).
//! 2. **Validate**: the claimant signs the message and submits the signature.
//!    If it verifies while the ticket is live, the ticket is promoted to a
//!    [`ValidatedGrant`].
//! 3. **Consume**: registering a star consumes the grant. One grant, one
//!    registration.
//!
//! ## State Machine
//!
//! ```text
//! NoTicket ──request──▶ Pending ──valid signature──▶ Validated ──consume──▶ NoTicket
//!                          │
//!                          └──window elapsed──▶ Expired (dropped on next read)
//! ```
//!
//! ## Expiry
//!
//! There are no per-ticket timers. A ticket is expired once
//! `now - requestTimeStamp > window`, evaluated on every read through an
//! injected [`Clock`](star_registry_core::Clock). [`spawn_reaper`] optionally
//! sweeps expired tickets in the background.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use star_registry_core::{Ed25519Verifier, Keypair, SystemClock};
//! use star_registry_validation::{ValidationWindowManager, WindowConfig};
//!
//! let manager = ValidationWindowManager::new(
//!     WindowConfig::default(),
//!     Arc::new(SystemClock),
//!     Arc::new(Ed25519Verifier),
//! );
//!
//! let keypair = Keypair::generate();
//! let address = keypair.address().to_hex();
//!
//! let ticket = manager.request_ticket(&address).unwrap();
//! let signature = keypair.sign_message(&ticket.message);
//! let grant = manager.validate_signature(&address, &signature).unwrap();
//! assert!(grant.register_star);
//!
//! assert!(manager.consume_grant(&address));
//! assert!(!manager.consume_grant(&address));
//! ```

pub mod config;
pub mod error;
pub mod grant;
pub mod reaper;
pub mod ticket;
pub mod window;

pub use config::WindowConfig;
pub use error::{Result, WindowError};
pub use grant::{GrantStatus, ValidatedGrant, SIGNATURE_VALID};
pub use reaper::{spawn_reaper, ReaperHandle};
pub use ticket::ValidationTicket;
pub use window::ValidationWindowManager;
