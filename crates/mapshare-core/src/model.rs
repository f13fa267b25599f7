// ── Device data model ──
//
// Schema-free attribute maps keyed by the tracker's external identifier.
// The core only interprets a handful of well-known attributes; everything
// else passes through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provider-internal numeric device ID, required by the message endpoint.
pub const ATTR_PROVIDER_ID: &str = "Id";
/// Device name as registered with the provider.
pub const ATTR_NAME: &str = "Name";
/// Name shown on the shared map.
pub const ATTR_MAP_DISPLAY_NAME: &str = "Map Display Name";

/// Attributes of a single tracker, as reported by the device fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord {
    attributes: BTreeMap<String, String>,
}

impl DeviceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attributes.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The provider device ID (`Id`), if the record carries one.
    pub fn provider_id(&self) -> Option<&str> {
        self.get(ATTR_PROVIDER_ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(ATTR_NAME)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get(ATTR_MAP_DISPLAY_NAME)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl From<BTreeMap<String, String>> for DeviceRecord {
    fn from(attributes: BTreeMap<String, String>) -> Self {
        Self { attributes }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// All trackers visible through a MapShare link, keyed by device key.
///
/// Snapshots are immutable once published: the store swaps in a whole new
/// snapshot on each successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceSnapshot {
    devices: BTreeMap<String, DeviceRecord>,
}

impl DeviceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style device insert.
    pub fn with_device(mut self, key: impl Into<String>, record: DeviceRecord) -> Self {
        self.devices.insert(key.into(), record);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, record: DeviceRecord) -> Option<DeviceRecord> {
        self.devices.insert(key.into(), record)
    }

    pub fn get(&self, key: &str) -> Option<&DeviceRecord> {
        self.devices.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.devices.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceRecord)> {
        self.devices.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl From<BTreeMap<String, DeviceRecord>> for DeviceSnapshot {
    fn from(devices: BTreeMap<String, DeviceRecord>) -> Self {
        Self { devices }
    }
}

impl<K: Into<String>> FromIterator<(K, DeviceRecord)> for DeviceSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, DeviceRecord)>>(iter: I) -> Self {
        Self {
            devices: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
