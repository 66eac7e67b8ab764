// Shared transport configuration for building reqwest::Client instances.
//
// The auth and gateway clients share timeout and user-agent settings
// through this module, avoiding duplicated builder logic.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            // The vendor queues throttled requests server-side, and a full
            // aggregation pass paces itself across many sequential calls.
            // Individual requests stay generous rather than failing early.
            timeout: Duration::from_secs(120),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("homelink/0.1.0")
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
