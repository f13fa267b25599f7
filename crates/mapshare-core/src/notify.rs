// ── Notification adapter ──
//
// Notification-style front end: targets are device keys or human names,
// an empty target list means every known device.

use tracing::{error, info, warn};

use crate::coordinator::Coordinator;
use crate::dispatcher::{DispatchOutcome, DispatchRequest};
use crate::error::CoreError;
use crate::model::DeviceSnapshot;

/// Sends notifications through a [`Coordinator`].
#[derive(Clone)]
pub struct Notifier {
    coordinator: Coordinator,
}

impl Notifier {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Send `message` to the devices named by `targets`.
    ///
    /// Each target is matched against device keys, `Name` and
    /// `Map Display Name`. Nothing is sent, and `NoValidTargets` is
    /// returned, when no device matches. `from_addr` falls back to the
    /// configured default sender.
    pub async fn notify<S: AsRef<str>>(
        &self,
        message: &str,
        targets: &[S],
        from_addr: Option<&str>,
    ) -> Result<DispatchOutcome, CoreError> {
        let snapshot = self.coordinator.current_snapshot();
        let device_keys = select_device_keys(&snapshot, targets);

        if device_keys.is_empty() {
            warn!("no valid device targets found for notification");
            return Ok(DispatchOutcome::NoValidTargets);
        }

        let mut request = DispatchRequest::new(device_keys, message);
        if let Some(from) = from_addr {
            request = request.with_sender(from);
        }

        let outcome = self.coordinator.send_message(request).await?;
        match &outcome {
            DispatchOutcome::Sent { device_ids } => {
                info!(?device_ids, text = message, "sent notification");
            }
            DispatchOutcome::NoValidTargets => {
                warn!("notification targets resolved to no device IDs");
            }
            DispatchOutcome::TransportFailure { reason, .. } => {
                error!(%reason, "failed to send notification");
            }
        }
        Ok(outcome)
    }
}

/// Device keys selected by `targets`.
///
/// An empty `targets` selects every device. Otherwise a device is selected
/// once for each target equal to its key, `Name`, or `Map Display Name`.
pub fn select_device_keys<S: AsRef<str>>(snapshot: &DeviceSnapshot, targets: &[S]) -> Vec<String> {
    if targets.is_empty() {
        return snapshot.keys().map(str::to_owned).collect();
    }

    let mut keys = Vec::new();
    for target in targets {
        let target = target.as_ref();
        for (key, record) in snapshot.iter() {
            let matches = key == target
                || record.name() == Some(target)
                || record.display_name() == Some(target);
            if matches {
                keys.push(key.to_owned());
            }
        }
    }
    keys
}
