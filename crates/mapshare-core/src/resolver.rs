// ── Device ID resolution ──
//
// Maps caller-supplied identifiers to provider device IDs using a
// snapshot. Known device keys are replaced by their `Id` attribute;
// unknown identifiers are assumed to already be provider IDs.

use tracing::warn;

use crate::model::DeviceSnapshot;

/// Resolves target identifiers against one snapshot.
///
/// Resolution is lenient: an identifier that isn't a device key passes
/// through verbatim, so a typo becomes a send to a literal (probably
/// invalid) ID rather than an error. Input order is kept and duplicates
/// are not removed.
#[derive(Debug, Clone, Copy)]
pub struct DeviceResolver<'a> {
    snapshot: &'a DeviceSnapshot,
}

impl<'a> DeviceResolver<'a> {
    pub fn new(snapshot: &'a DeviceSnapshot) -> Self {
        Self { snapshot }
    }

    /// Resolve each target to a provider device ID.
    ///
    /// A known device whose record has no `Id` attribute is logged and
    /// skipped, contributing nothing to the result.
    pub fn resolve<S: AsRef<str>>(&self, targets: &[S]) -> Vec<String> {
        targets
            .iter()
            .filter_map(|target| self.resolve_one(target.as_ref()))
            .collect()
    }

    fn resolve_one(&self, target: &str) -> Option<String> {
        let Some(record) = self.snapshot.get(target) else {
            return Some(target.to_owned());
        };
        match record.provider_id() {
            Some(id) => Some(id.to_owned()),
            None => {
                warn!(device = target, "no Id found for device, skipping");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DeviceRecord;

    fn snapshot() -> DeviceSnapshot {
        DeviceSnapshot::new()
            .with_device("300012345", DeviceRecord::new().with("Id", "99"))
            .with_device("300067890", DeviceRecord::new().with("Name", "No id"))
    }

    #[test]
    fn known_key_resolves_to_provider_id() {
        let snap = snapshot();
        assert_eq!(DeviceResolver::new(&snap).resolve(&["300012345"]), vec!["99"]);
    }

    #[test]
    fn unknown_identifier_passes_through() {
        let snap = snapshot();
        assert_eq!(DeviceResolver::new(&snap).resolve(&["unknown-id"]), vec!["unknown-id"]);
    }

    #[test]
    fn mixed_targets() {
        let snap = snapshot();
        assert_eq!(
            DeviceResolver::new(&snap).resolve(&["300012345", "unknown-id"]),
            vec!["99", "unknown-id"]
        );
    }

    #[test]
    fn record_without_id_is_skipped() {
        let snap = snapshot();
        let resolved = DeviceResolver::new(&snap).resolve(&["300067890", "300012345"]);
        assert_eq!(resolved, vec!["99"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let snap = snapshot();
        assert_eq!(
            DeviceResolver::new(&snap).resolve(&["300012345", "300012345"]),
            vec!["99", "99"]
        );
    }

    #[test]
    fn empty_snapshot_passes_everything_through() {
        let snap = DeviceSnapshot::new();
        let targets = vec!["300012345".to_owned(), "42".to_owned()];
        assert_eq!(DeviceResolver::new(&snap).resolve(&targets), targets);
    }

    #[test]
    fn resolution_is_repeatable_for_an_unchanged_snapshot() {
        let snap = snapshot();
        let resolver = DeviceResolver::new(&snap);
        let targets = ["300012345", "300067890", "x"];
        assert_eq!(resolver.resolve(&targets), resolver.resolve(&targets));
    }
}
