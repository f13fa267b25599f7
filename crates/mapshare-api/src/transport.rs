// Shared transport configuration for building reqwest::Client instances.
//
// The client carries no shared cookie store. Each send fills its own jar
// from the bootstrap response (see `messaging::Session`).

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("mapshare/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout applied by reqwest.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Transport config with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_names_the_crate_version() {
        let config = TransportConfig::default();
        assert!(config.user_agent.starts_with("mapshare/"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn with_timeout_keeps_other_defaults() {
        let config = TransportConfig::with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, TransportConfig::default().user_agent);
        assert!(config.build_client().is_ok());
    }
}
