//! Validation window configuration.

use std::time::Duration;

/// Default validation window, in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 300;

/// Default trailing component of the challenge message.
pub const DEFAULT_MESSAGE_SUFFIX: &str = "starRegistry";

/// Configuration for the validation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// How long a ticket stays live after issuance, in seconds.
    pub window_secs: u64,
    /// Last component of `"<address>:<timestamp>:<suffix>"`.
    pub message_suffix: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
            message_suffix: DEFAULT_MESSAGE_SUFFIX.to_string(),
        }
    }
}

impl WindowConfig {
    /// Set the window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window_secs = window.as_secs();
        self
    }

    /// Set the challenge message suffix.
    pub fn message_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.message_suffix = suffix.into();
        self
    }
}
