//! Device source for the CLI: the table declared in the active profile.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use mapshare_core::{DeviceFetcher, DeviceSnapshot, FetchError};

/// Serves a fixed snapshot on every fetch.
pub struct ProfileDevices {
    snapshot: DeviceSnapshot,
}

impl ProfileDevices {
    pub fn new(snapshot: DeviceSnapshot) -> Self {
        Self { snapshot }
    }
}

impl DeviceFetcher for ProfileDevices {
    fn fetch_devices(&self) -> BoxFuture<'_, Result<DeviceSnapshot, FetchError>> {
        let snapshot = self.snapshot.clone();
        async move { Ok(snapshot) }.boxed()
    }
}
