// ── Message dispatch ──
//
// Sends a message to already-resolved provider device IDs and turns every
// failure into a `DispatchOutcome` the caller must look at. No retries:
// the caller decides whether to send again.

use std::time::Duration;

use mapshare_api::{MapShareClient, TransportConfig};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::MapShareConfig;
use crate::deadline::with_deadline;
use crate::error::CoreError;

/// A message addressed to one or more targets.
///
/// Targets may be device keys from the snapshot or raw provider IDs.
/// Without an explicit sender the coordinator's default label is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub targets: Vec<String>,
    pub message: String,
    pub sender: Option<String>,
}

impl DispatchRequest {
    pub fn new<I, S>(targets: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            message: message.into(),
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Result of a send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The service accepted the message for these provider IDs.
    Sent { device_ids: Vec<String> },
    /// Resolution produced no IDs; nothing was sent.
    NoValidTargets,
    /// Bootstrap or send failed (network error, non-2xx, or timeout).
    TransportFailure {
        reason: String,
        status: Option<u16>,
    },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// Convert into a `Result`, for callers that propagate with `?`.
    pub fn into_result(self) -> Result<Vec<String>, CoreError> {
        match self {
            Self::Sent { device_ids } => Ok(device_ids),
            Self::NoValidTargets => Err(CoreError::NoValidTargets),
            Self::TransportFailure { reason, status } => Err(CoreError::Transport {
                message: reason,
                status,
            }),
        }
    }
}

/// Performs the two-phase MapShare send under an explicit deadline.
pub struct MessageDispatcher {
    client: MapShareClient,
    timeout: Duration,
}

impl MessageDispatcher {
    pub fn new(client: MapShareClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Build a dispatcher (and its HTTP client) from a link configuration.
    pub fn from_config(config: &MapShareConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.send_timeout);
        let client = MapShareClient::new(
            config.base_url.clone(),
            config.link_name.clone(),
            &transport,
        )?;
        Ok(Self::new(client, config.send_timeout))
    }

    pub fn client(&self) -> &MapShareClient {
        &self.client
    }

    /// Send `message` to `device_ids`.
    ///
    /// An empty ID list returns [`DispatchOutcome::NoValidTargets`] without
    /// touching the network. The bootstrap and the send together must
    /// finish within the dispatcher's timeout.
    pub async fn dispatch(
        &self,
        device_ids: Vec<String>,
        message: &str,
        sender: &str,
    ) -> DispatchOutcome {
        if device_ids.is_empty() {
            warn!(link = self.client.link_name(), "no valid device IDs to send to");
            return DispatchOutcome::NoValidTargets;
        }

        let send = self
            .client
            .send_message_to_devices(&device_ids, message, sender);

        let result = with_deadline(self.timeout, send).await;
        match result {
            Ok(Ok(())) => {
                info!(?device_ids, "successfully sent message to devices");
                DispatchOutcome::Sent { device_ids }
            }
            Ok(Err(e)) => {
                error!(error = %e, "failed to send message");
                DispatchOutcome::TransportFailure {
                    status: e.status(),
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                error!(error = %e, "failed to send message");
                DispatchOutcome::TransportFailure {
                    reason: e.to_string(),
                    status: None,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn request_sender_is_optional() {
        let request = DispatchRequest::new(["300012345"], "hello");
        assert_eq!(request.targets, vec!["300012345".to_owned()]);
        assert_eq!(request.sender, None);
        assert_eq!(
            request.with_sender("Base camp").sender.as_deref(),
            Some("Base camp")
        );
    }

    #[test]
    fn outcome_into_result() {
        let sent = DispatchOutcome::Sent {
            device_ids: vec!["99".into()],
        };
        assert!(sent.is_sent());
        assert_eq!(sent.into_result().unwrap(), vec!["99".to_owned()]);

        assert!(matches!(
            DispatchOutcome::NoValidTargets.into_result(),
            Err(CoreError::NoValidTargets)
        ));

        let failed = DispatchOutcome::TransportFailure {
            reason: "HTTP 500".into(),
            status: Some(500),
        };
        assert!(matches!(
            failed.into_result(),
            Err(CoreError::Transport { status: Some(500), .. })
        ));
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(DispatchOutcome::NoValidTargets).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "no_valid_targets" }));
    }
}
