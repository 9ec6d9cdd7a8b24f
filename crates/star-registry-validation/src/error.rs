//! Error types for the validation window.

use star_registry_core::CoreError;
use thiserror::Error;

/// Errors that can occur during ticket and grant operations.
#[derive(Debug, Error)]
pub enum WindowError {
    /// Empty address supplied.
    #[error("an address is required to start validation")]
    MissingAddress,

    /// No live ticket for the address (never requested, or expired).
    #[error("no pending validation request for address {0}")]
    NoPendingTicket(String),

    /// The signature does not match the challenge and address.
    #[error("signature does not match the challenge for address {0}")]
    SignatureMismatch(String),

    /// The address or signature could not be parsed.
    #[error("signature verification error: {0}")]
    Verifier(#[from] CoreError),
}

/// Result type for validation window operations.
pub type Result<T> = std::result::Result<T, WindowError>;
