//! Error types for the Star Registry.

use star_registry_core::{CoreError, InputError};
use star_registry_store::StoreError;
use star_registry_validation::WindowError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No block at the requested height.
    #[error("block #{0} not found")]
    BlockNotFound(u64),

    /// No block with the requested hash.
    #[error("no block with hash {0}")]
    HashNotFound(String),

    /// No block registered by the address.
    #[error("no stars registered by address {0}")]
    AddressNotFound(String),

    /// The ledger has no genesis block.
    #[error("ledger is not initialized")]
    NotInitialized,

    /// Registration attempted without a grant.
    #[error("address {0} has not been validated")]
    NotValidated(String),

    /// Malformed registration input.
    #[error("invalid registration: {0}")]
    Input(#[from] InputError),

    /// Ticket or signature error.
    #[error("validation error: {0}")]
    Window(#[from] WindowError),

    /// A different block already occupies the height.
    #[error("conflict at height {height}: a different block is already stored")]
    Conflict { height: u64 },

    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Coarse classification a caller can map to a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Storage,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BlockNotFound(_)
            | Self::HashNotFound(_)
            | Self::AddressNotFound(_)
            | Self::NotInitialized => ErrorKind::NotFound,
            Self::Window(WindowError::NoPendingTicket(_)) => ErrorKind::NotFound,
            Self::NotValidated(_) | Self::Input(_) | Self::Window(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Core(_) | Self::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
