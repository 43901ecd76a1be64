use std::time::Duration;
use sublink::constants::{
    DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RESPONSE_HISTORY_CAPACITY,
    DEFAULT_SS58_FORMAT,
};

/// Tunables for a `NodeClient` and its dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Reconnect and resend when a send hits a closed channel.
    pub auto_reconnect: bool,
    /// Upper bound on reconnect rounds a single call may trigger.
    pub max_reconnect_attempts: u32,
    /// How long a call waits for its matching response.
    pub request_timeout: Duration,
    /// Successfully claimed responses retained for inspection.
    pub response_history_capacity: usize,
    /// Address format reported when neither an override nor the node supply one.
    pub default_ss58_format: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            response_history_capacity: DEFAULT_RESPONSE_HISTORY_CAPACITY,
            default_ss58_format: DEFAULT_SS58_FORMAT,
        }
    }
}
