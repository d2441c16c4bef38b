use thiserror::Error;

/// Top-level error type for the `thinqly-api` crate.
///
/// Covers every failure mode of the ThinQ HTTP surface: transport,
/// timeouts, authentication, the rate-limit sentinel, and payload
/// shape problems. `thinqly-core` folds these into per-home and
/// per-device outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Authentication / throttling ─────────────────────────────────
    /// ThinQ throttled the caller. The service reports this through a
    /// 401 carrying error code 1314 in the body, not through a 429.
    #[error("Rate limited by ThinQ: {message}")]
    RateLimited { message: String },

    /// Genuine 401 (bad or revoked PAT).
    #[error("Authentication rejected: {message}")]
    Unauthorized { message: String },

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response that isn't a 401.
    #[error("ThinQ API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on a
    /// later cycle (as opposed to a credential problem).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
