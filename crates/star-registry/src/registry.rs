//! The registry: the validation window and the ledger behind one API.
//!
//! ```text
//! request_validation ──▶ validate_signature ──▶ register_star
//!      (ticket)              (grant)              (block)
//! ```
//!
//! A registration takes the address's grant before appending and puts it
//! back if the append fails, so a storage error never burns a validation.

use std::sync::Arc;

use star_registry_core::{
    Block, BlockView, Clock, SignatureVerifier, StarRegistration, SystemClock,
};
use star_registry_store::Store;
use star_registry_validation::{
    spawn_reaper, ReaperHandle, ValidatedGrant, ValidationTicket, ValidationWindowManager,
};
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::ledger::Ledger;

/// Star registry over a store.
pub struct Registry<S: Store> {
    ledger: Ledger<S>,
    window: Arc<ValidationWindowManager>,
    config: RegistryConfig,
    /// Keeps the background sweep alive for the registry's lifetime.
    _reaper: Option<ReaperHandle>,
}

impl<S: Store> Registry<S> {
    /// Open a registry on the system clock, creating genesis if needed.
    pub async fn open(
        store: S,
        verifier: Arc<dyn SignatureVerifier>,
        config: RegistryConfig,
    ) -> Result<Self> {
        Self::open_with_clock(store, Arc::new(SystemClock), verifier, config).await
    }

    /// Open a registry with an explicit clock.
    pub async fn open_with_clock(
        store: S,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn SignatureVerifier>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let ledger = Ledger::new(store, Arc::clone(&clock), config.genesis.clone());
        ledger.initialize().await?;

        let window = Arc::new(ValidationWindowManager::new(
            config.window.clone(),
            clock,
            verifier,
        ));
        let reaper = config
            .reaper_interval
            .map(|period| spawn_reaper(Arc::clone(&window), period));

        info!(
            height = ledger.height().await?,
            window_secs = config.window.window_secs,
            "registry opened"
        );

        Ok(Self {
            ledger,
            window,
            config,
            _reaper: reaper,
        })
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn window(&self) -> &ValidationWindowManager {
        &self.window
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Start, or poll, validation for `address`.
    pub fn request_validation(&self, address: &str) -> Result<ValidationTicket> {
        Ok(self.window.request_ticket(address)?)
    }

    /// Submit the signed challenge for `address`.
    pub fn validate_signature(&self, address: &str, signature: &str) -> Result<ValidatedGrant> {
        Ok(self.window.validate_signature(address, signature)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a block for a validated address, consuming its grant.
    pub async fn register_star(&self, registration: &StarRegistration) -> Result<BlockView> {
        registration.validate(self.config.max_story_bytes)?;

        let address = registration.address.as_str();
        let grant = self
            .window
            .take_grant(address)
            .ok_or_else(|| RegistryError::NotValidated(address.to_string()))?;

        let block = match self.ledger.append(address, registration.to_record()).await {
            Ok(block) => block,
            Err(e) => {
                warn!(address, error = %e, "registration failed, grant restored");
                self.window.restore_grant(grant);
                return Err(e);
            }
        };

        Ok(BlockView::try_from(block)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn height(&self) -> Result<u64> {
        self.ledger.height().await
    }

    /// The block at `height`, story decoded.
    pub async fn block(&self, height: u64) -> Result<BlockView> {
        self.ledger.view_by_height(height).await
    }

    /// The newest block.
    pub async fn latest(&self) -> Result<Block> {
        self.ledger.latest().await
    }

    /// Every star registered by `address`. Fails when there are none.
    pub async fn stars_by_address(&self, address: &str) -> Result<Vec<BlockView>> {
        let views = self.ledger.view_by_address(address).await?;
        if views.is_empty() {
            return Err(RegistryError::AddressNotFound(address.to_string()));
        }
        Ok(views)
    }

    pub async fn star_by_hash(&self, hash: &str) -> Result<BlockView> {
        self.ledger.view_by_hash(hash).await
    }

    /// Heights that failed verification. Empty for an intact chain.
    pub async fn verify_chain(&self) -> Result<Vec<u64>> {
        self.ledger.verify_chain().await
    }
}
