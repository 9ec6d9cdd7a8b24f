//! Validation tickets: the challenge issued to a claimant.

use serde::{Deserialize, Serialize};

use crate::config::WindowConfig;

/// A time-boxed challenge for one address.
///
/// `validation_window` is the full window on the stored ticket. Views handed
/// back on repeated requests carry the remaining time instead; the deadline
/// itself never moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationTicket {
    pub address: String,
    /// Issuance time (unix seconds).
    pub request_time_stamp: u64,
    /// `"<address>:<requestTimeStamp>:<suffix>"`, the text to sign.
    pub message: String,
    /// Window length in seconds.
    pub validation_window: u64,
}

impl ValidationTicket {
    /// Issue a fresh ticket at `now`.
    pub fn issue(address: &str, now: u64, config: &WindowConfig) -> Self {
        Self {
            address: address.to_string(),
            request_time_stamp: now,
            message: challenge_message(address, now, &config.message_suffix),
            validation_window: config.window_secs,
        }
    }

    /// Seconds since issuance.
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.request_time_stamp)
    }

    /// Seconds left before expiry.
    pub fn remaining(&self, now: u64) -> u64 {
        self.validation_window.saturating_sub(self.elapsed(now))
    }

    /// Expired once strictly more than the window has elapsed.
    pub fn is_expired(&self, now: u64) -> bool {
        self.elapsed(now) > self.validation_window
    }

    /// Last second at which the ticket is still live.
    pub fn deadline(&self) -> u64 {
        self.request_time_stamp.saturating_add(self.validation_window)
    }

    /// Copy with the window replaced by the time remaining at `now`.
    pub fn view_at(&self, now: u64) -> Self {
        Self {
            validation_window: self.remaining(now),
            ..self.clone()
        }
    }
}

/// Build the challenge text for an address.
pub fn challenge_message(address: &str, timestamp: u64, suffix: &str) -> String {
    format!("{}:{}:{}", address, timestamp, suffix)
}
