// ── Runtime coordinator configuration ──
//
// Describes *which* MapShare link to poll and how. Carries the optional
// link password but never touches disk; the host builds a
// `MapShareConfig` and hands it to the coordinator.

use std::time::Duration;

use mapshare_api::{DEFAULT_SENDER, default_base_url};
use secrecy::SecretString;
use url::Url;

/// Default polling period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
/// Default bound on a single device fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Default bound on the whole bootstrap + send exchange.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one MapShare link.
#[derive(Debug, Clone)]
pub struct MapShareConfig {
    /// Service root (e.g., `https://share.garmin.com/`).
    pub base_url: Url,
    /// MapShare link name, the path segment after the base URL.
    pub link_name: String,
    /// Optional MapShare link password, passed to the device fetcher.
    pub link_password: Option<SecretString>,
    /// How often the background task refreshes. Zero disables polling.
    pub refresh_interval: Duration,
    pub fetch_timeout: Duration,
    pub send_timeout: Duration,
    /// Sender label used when a request does not name one.
    pub default_sender: String,
}

impl MapShareConfig {
    /// Defaults for `link_name` against the public MapShare service.
    pub fn new(link_name: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            link_name: link_name.into(),
            link_password: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            default_sender: DEFAULT_SENDER.into(),
        }
    }

    /// Coordinator name used in log output: `mapshare-{link_name}`.
    pub fn coordinator_name(&self) -> String {
        format!("mapshare-{}", self.link_name)
    }
}
