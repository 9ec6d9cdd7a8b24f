//! Validated grants: proof that an address signed its challenge.

use serde::{Deserialize, Serialize};

use crate::ticket::ValidationTicket;

/// Value of `messageSignature` on every grant.
pub const SIGNATURE_VALID: &str = "valid";

/// The ticket details a grant was issued from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantStatus {
    pub address: String,
    pub request_time_stamp: u64,
    pub message: String,
    /// Seconds of the window left when the signature was verified.
    pub validation_window: u64,
    pub message_signature: String,
}

/// A single-use permission to register one star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedGrant {
    pub register_star: bool,
    pub status: GrantStatus,
}

impl ValidatedGrant {
    /// Promote a ticket verified with `remaining` seconds left.
    pub fn from_ticket(ticket: &ValidationTicket, remaining: u64) -> Self {
        Self {
            register_star: true,
            status: GrantStatus {
                address: ticket.address.clone(),
                request_time_stamp: ticket.request_time_stamp,
                message: ticket.message.clone(),
                validation_window: remaining,
                message_signature: SIGNATURE_VALID.to_string(),
            },
        }
    }

    pub fn address(&self) -> &str {
        &self.status.address
    }

    /// Window remaining at verification time.
    pub fn remaining(&self) -> u64 {
        self.status.validation_window
    }
}
