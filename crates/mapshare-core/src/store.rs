// ── Device snapshot store ──
//
// Holds the latest successfully fetched snapshot. Readers get a cheap
// `Arc` clone and can iterate it for as long as they like; a refresh swaps
// in a whole new snapshot, it never edits the current one in place.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{DeviceRecord, DeviceSnapshot};

/// Wait-free store for the current [`DeviceSnapshot`].
///
/// Starts empty and only ever holds the result of the most recent
/// successful fetch. Failed refreshes don't touch it.
pub struct SnapshotStore {
    current: ArcSwap<DeviceSnapshot>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);
        Self {
            current: ArcSwap::from_pointee(DeviceSnapshot::new()),
            last_refresh,
        }
    }

    /// The current snapshot. Empty until the first successful refresh.
    pub fn current(&self) -> Arc<DeviceSnapshot> {
        self.current.load_full()
    }

    /// Atomically publish `snapshot` and stamp the refresh time.
    pub fn replace(&self, snapshot: Arc<DeviceSnapshot>) {
        self.current.store(snapshot);
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn device(&self, key: &str) -> Option<DeviceRecord> {
        self.current.load().get(key).cloned()
    }

    pub fn device_count(&self) -> usize {
        self.current.load().len()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last successful refresh happened, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    /// Watch the last-successful-refresh timestamp.
    pub fn subscribe_last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
