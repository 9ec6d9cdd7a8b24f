//! The validation window manager.
//!
//! Owns every pending ticket and every unconsumed grant. All state lives in
//! one instance behind one mutex: each operation's check and write happen
//! under the same lock, so two requests for one address cannot both issue a
//! ticket, and a ticket cannot expire between being checked and promoted.
//!
//! Promotion retires the ticket. Once a signature verifies, the address
//! holds a grant and no ticket; a new request starts a fresh window.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use star_registry_core::{Clock, CoreError, SignatureVerifier};
use tracing::{debug, info, warn};

use crate::config::WindowConfig;
use crate::error::{Result, WindowError};
use crate::grant::ValidatedGrant;
use crate::ticket::ValidationTicket;

#[derive(Debug, Default)]
struct WindowState {
    /// Pending tickets by address. May hold expired tickets until next read.
    tickets: HashMap<String, ValidationTicket>,
    /// Unconsumed grants by address.
    grants: HashMap<String, ValidatedGrant>,
}

impl WindowState {
    /// Live ticket for `address`, dropping it first if it has expired.
    fn live_ticket(&mut self, address: &str, now: u64) -> Option<&ValidationTicket> {
        if self
            .tickets
            .get(address)
            .is_some_and(|ticket| ticket.is_expired(now))
        {
            self.tickets.remove(address);
            debug!(address, "validation ticket expired");
        }
        self.tickets.get(address)
    }
}

/// Issues tickets, verifies signatures and hands out single-use grants.
pub struct ValidationWindowManager {
    config: WindowConfig,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn SignatureVerifier>,
    state: Mutex<WindowState>,
}

impl ValidationWindowManager {
    pub fn new(
        config: WindowConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            config,
            clock,
            verifier,
            state: Mutex::new(WindowState::default()),
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    // The maps are only mutated by single inserts and removes, so a panic
    // elsewhere cannot leave them half-updated.
    fn state(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tickets
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a ticket for `address`, or report the one already pending.
    ///
    /// A repeated request returns the pending ticket with `validationWindow`
    /// set to the time remaining. It never extends the deadline.
    pub fn request_ticket(&self, address: &str) -> Result<ValidationTicket> {
        if address.trim().is_empty() {
            return Err(WindowError::MissingAddress);
        }

        let now = self.clock.now_secs();
        let mut state = self.state();

        if let Some(ticket) = state.live_ticket(address, now) {
            let view = ticket.view_at(now);
            debug!(address, remaining = view.validation_window, "validation ticket polled");
            return Ok(view);
        }

        let ticket = ValidationTicket::issue(address, now, &self.config);
        state.tickets.insert(address.to_string(), ticket.clone());
        info!(
            address,
            request_time_stamp = ticket.request_time_stamp,
            window = ticket.validation_window,
            "validation ticket issued"
        );
        Ok(ticket)
    }

    /// The live ticket for `address`, as a remaining-time view.
    pub fn pending_ticket(&self, address: &str) -> Option<ValidationTicket> {
        let now = self.clock.now_secs();
        self.state()
            .live_ticket(address, now)
            .map(|ticket| ticket.view_at(now))
    }

    /// Drop every expired ticket. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_secs();
        let mut state = self.state();
        let before = state.tickets.len();
        state.tickets.retain(|_, ticket| !ticket.is_expired(now));
        before - state.tickets.len()
    }

    /// Number of tickets currently held, including any not yet purged.
    pub fn pending_count(&self) -> usize {
        self.state().tickets.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signatures
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify `signature` against the pending challenge for `address`.
    ///
    /// On success the ticket is retired and a grant carrying the remaining
    /// window is stored, replacing any earlier grant for the address. On
    /// failure the ticket is left as it was and keeps counting down.
    pub fn validate_signature(&self, address: &str, signature: &str) -> Result<ValidatedGrant> {
        let now = self.clock.now_secs();
        let mut state = self.state();

        let ticket = state
            .live_ticket(address, now)
            .ok_or_else(|| WindowError::NoPendingTicket(address.to_string()))?;
        let remaining = ticket.remaining(now);

        match self.verifier.verify(&ticket.message, address, signature) {
            Ok(()) => {}
            Err(CoreError::InvalidSignature) => {
                warn!(address, "signature rejected");
                return Err(WindowError::SignatureMismatch(address.to_string()));
            }
            Err(e) => {
                warn!(address, error = %e, "signature could not be checked");
                return Err(WindowError::Verifier(e));
            }
        }

        let grant = ValidatedGrant::from_ticket(ticket, remaining);
        state.tickets.remove(address);
        state.grants.insert(address.to_string(), grant.clone());
        info!(address, remaining, "signature validated, grant issued");
        Ok(grant)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grants
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `address` holds an unconsumed grant.
    pub fn has_grant(&self, address: &str) -> bool {
        self.state().grants.contains_key(address)
    }

    /// Consume the grant for `address`. Returns false when there is none.
    pub fn consume_grant(&self, address: &str) -> bool {
        self.take_grant(address).is_some()
    }

    /// Remove and return the grant for `address`.
    pub fn take_grant(&self, address: &str) -> Option<ValidatedGrant> {
        let grant = self.state().grants.remove(address);
        if grant.is_some() {
            debug!(address, "grant consumed");
        }
        grant
    }

    /// Put back a grant taken by [`take_grant`](Self::take_grant).
    ///
    /// A grant issued for the same address in the meantime wins.
    pub fn restore_grant(&self, grant: ValidatedGrant) {
        let address = grant.address().to_string();
        debug!(address = %address, "grant restored");
        self.state().grants.entry(address).or_insert(grant);
    }

    /// Number of unconsumed grants.
    pub fn grant_count(&self) -> usize {
        self.state().grants.len()
    }
}

impl std::fmt::Debug for ValidationWindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ValidationWindowManager")
            .field("config", &self.config)
            .field("tickets", &state.tickets.len())
            .field("grants", &state.grants.len())
            .finish()
    }
}
