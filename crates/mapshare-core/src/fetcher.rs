// ── Device fetcher contract ──
//
// The coordinator does not know how tracker data is retrieved or parsed.
// A host supplies a `DeviceFetcher` bound to a link name and optional
// password; the coordinator only sees its snapshot or its typed failure.

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::model::DeviceSnapshot;

/// Why a fetch failed.
///
/// Connectivity problems are transient and retried on the next tick.
/// An authentication failure halts polling until the host restarts the
/// coordinator with fresh credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("cannot reach MapShare: {reason}")]
    Connectivity { reason: String },

    #[error("MapShare rejected the credentials: {reason}")]
    Authentication { reason: String },
}

impl From<mapshare_api::Error> for FetchError {
    fn from(err: mapshare_api::Error) -> Self {
        if err.is_auth_rejected() {
            FetchError::Authentication {
                reason: err.to_string(),
            }
        } else {
            FetchError::Connectivity {
                reason: err.to_string(),
            }
        }
    }
}

/// Retrieves the current device map for one MapShare link.
///
/// Returned futures are boxed so the coordinator can hold the fetcher as
/// `Arc<dyn DeviceFetcher>`.
pub trait DeviceFetcher: Send + Sync {
    fn fetch_devices(&self) -> BoxFuture<'_, Result<DeviceSnapshot, FetchError>>;
}
