// Shared transport configuration for building reqwest::Client instances.
//
// The ThinQ API is a public TLS endpoint, so there is no certificate
// knob here -- just the bounded per-request timeout that every call in
// the fetch pipeline inherits.

use std::time::Duration;

/// Default per-request timeout. ThinQ device-state calls can hang when
/// a device's cloud session is half-dead; 12 seconds bounds the damage.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("thinqly/0.1.0")
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
