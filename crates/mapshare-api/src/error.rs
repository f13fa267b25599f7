use thiserror::Error;

/// Top-level error type for the `mapshare-api` crate.
///
/// Covers transport failures, URL construction, and non-2xx responses from
/// either phase of the message flow. `mapshare-core` maps these into
/// outcome values and user-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── MapShare responses ──────────────────────────────────────────
    /// The map page fetch that establishes the session returned non-2xx.
    #[error("Session bootstrap failed (HTTP {status}): {body}")]
    Bootstrap { status: u16, body: String },

    /// The message endpoint returned non-2xx.
    #[error("MapShare rejected the request (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    // ── Request validation ──────────────────────────────────────────
    /// A send was attempted with no device IDs.
    #[error("No device IDs to send to")]
    NoDeviceIds,
}

impl Error {
    /// The HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Bootstrap { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server refused the request for credential reasons.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
