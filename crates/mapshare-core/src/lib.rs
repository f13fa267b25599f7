// mapshare-core: Polling coordinator and message dispatch on top of mapshare-api.

pub mod config;
pub mod coordinator;
pub mod deadline;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod notify;
pub mod resolver;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MapShareConfig;
pub use coordinator::{Coordinator, CoordinatorState, RefreshEvent, RefreshOutcome};
pub use deadline::with_deadline;
pub use dispatcher::{DispatchOutcome, DispatchRequest, MessageDispatcher};
pub use error::CoreError;
pub use fetcher::{DeviceFetcher, FetchError};
pub use model::{DeviceRecord, DeviceSnapshot};
pub use notify::Notifier;
pub use resolver::DeviceResolver;
pub use store::SnapshotStore;
