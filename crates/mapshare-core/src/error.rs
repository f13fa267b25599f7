// ── Core error types ──
//
// User-facing errors from mapshare-core. Send failures reach callers as
// `DispatchOutcome` values; `From<mapshare_api::Error>` covers the client
// setup path.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Operation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Refresh errors ───────────────────────────────────────────────
    /// A refresh failed transiently; any previous snapshot is still served.
    #[error("Device refresh failed: {reason}")]
    RefreshFailed { reason: String },

    // ── Dispatch errors ──────────────────────────────────────────────
    #[error("No valid device targets")]
    NoValidTargets,

    #[error("MapShare request failed: {message}")]
    Transport {
        message: String,
        /// HTTP status code (if the server answered).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Coordinator has been shut down")]
    CoordinatorShutdown,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mapshare_api::Error> for CoreError {
    fn from(err: mapshare_api::Error) -> Self {
        match err {
            mapshare_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            mapshare_api::Error::ClientBuild(message) => CoreError::Config { message },
            other => CoreError::Transport {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
