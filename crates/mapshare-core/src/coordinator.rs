// ── Refresh coordinator ──
//
// Lifecycle management for one MapShare link: an eager first refresh,
// periodic background refresh while anyone is listening, serialized
// fetches under a deadline, and message sends resolved against the
// current snapshot.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::MapShareConfig;
use crate::deadline::with_deadline;
use crate::dispatcher::{DispatchOutcome, DispatchRequest, MessageDispatcher};
use crate::error::CoreError;
use crate::fetcher::{DeviceFetcher, FetchError};
use crate::model::DeviceSnapshot;
use crate::resolver::DeviceResolver;
use crate::store::SnapshotStore;

const EVENT_CHANNEL_SIZE: usize = 16;

// ── Outcomes & events ────────────────────────────────────────────

/// Result of a single refresh attempt.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The fetch succeeded and its snapshot is now current.
    Success(Arc<DeviceSnapshot>),
    /// Credentials were rejected. Polling stops until the host restarts
    /// the coordinator with fresh credentials.
    AuthFailure { reason: String },
    /// Timeout or connectivity failure. The previous snapshot stays.
    TransientFailure { reason: String },
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn snapshot(&self) -> Option<&Arc<DeviceSnapshot>> {
        match self {
            Self::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Convert into a `Result`, for callers that propagate with `?`.
    pub fn into_result(self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        match self {
            Self::Success(snapshot) => Ok(snapshot),
            Self::AuthFailure { reason } => Err(CoreError::AuthenticationFailed { message: reason }),
            Self::TransientFailure { reason } => Err(CoreError::RefreshFailed { reason }),
        }
    }
}

/// Notification delivered to subscribers after every refresh.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// New data is available.
    Updated(Arc<DeviceSnapshot>),
    /// The refresh failed; the data subscribers hold is now stale.
    Stale { reason: String },
    /// Credentials were rejected and polling has stopped.
    ReauthRequired { reason: String },
}

/// Coordinator lifecycle state observable by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Constructed, [`start()`](Coordinator::start) not called yet.
    Idle,
    Running,
    /// Polling halted after an authentication failure. Sticky until the
    /// host builds a new coordinator.
    AuthFailed { reason: String },
    Stopped,
}

// ── Coordinator ──────────────────────────────────────────────────

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Hand clones directly to
/// whatever needs them (entities, a [`Notifier`](crate::Notifier)); there
/// is no global registry.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    name: String,
    config: MapShareConfig,
    fetcher: Arc<dyn DeviceFetcher>,
    dispatcher: MessageDispatcher,
    store: SnapshotStore,
    events: broadcast::Sender<RefreshEvent>,
    state: watch::Sender<CoordinatorState>,
    /// Held for the duration of a fetch so refreshes never overlap.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for CoordinatorInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Coordinator {
    /// Create a coordinator for `config`, fetching through `fetcher`.
    ///
    /// Does not fetch anything; call [`start()`](Self::start).
    pub fn new(config: MapShareConfig, fetcher: Arc<dyn DeviceFetcher>) -> Result<Self, CoreError> {
        let dispatcher = MessageDispatcher::from_config(&config)?;
        Ok(Self::with_dispatcher(config, fetcher, dispatcher))
    }

    /// Create a coordinator with a pre-built dispatcher.
    pub fn with_dispatcher(
        config: MapShareConfig,
        fetcher: Arc<dyn DeviceFetcher>,
        dispatcher: MessageDispatcher,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let (state, _) = watch::channel(CoordinatorState::Idle);

        Self {
            inner: Arc::new(CoordinatorInner {
                name: config.coordinator_name(),
                config,
                fetcher,
                dispatcher,
                store: SnapshotStore::new(),
                events,
                state,
                refresh_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &MapShareConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    /// The latest successfully fetched snapshot, or an empty one.
    ///
    /// Never blocks and never triggers a fetch.
    pub fn current_snapshot(&self) -> Arc<DeviceSnapshot> {
        self.inner.store.current()
    }

    // ── Observation ──────────────────────────────────────────────

    /// Subscribe to refresh events. Background polling only fetches while
    /// at least one receiver is alive.
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.inner.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.events.receiver_count()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state(&self) -> watch::Receiver<CoordinatorState> {
        self.inner.state.subscribe()
    }

    pub fn current_state(&self) -> CoordinatorState {
        self.inner.state.borrow().clone()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Refresh once, then spawn the polling task.
    ///
    /// Polling is not started when the first refresh is rejected for
    /// credentials, or when the refresh interval is zero.
    pub async fn start(&self) -> Result<RefreshOutcome, CoreError> {
        let outcome = self.refresh().await?;
        if matches!(outcome, RefreshOutcome::AuthFailure { .. }) {
            return Ok(outcome);
        }

        let interval = self.inner.config.refresh_interval;
        let mut handles = self.inner.task_handles.lock().await;
        if handles.is_empty() && !interval.is_zero() {
            handles.push(tokio::spawn(poll_task(
                Arc::downgrade(&self.inner),
                self.inner.cancel.clone(),
                self.inner.name.clone(),
                interval,
            )));
        }
        drop(handles);

        self.inner.state.send_if_modified(|state| {
            if *state == CoordinatorState::Idle {
                *state = CoordinatorState::Running;
                true
            } else {
                false
            }
        });
        info!(coordinator = %self.inner.name, ?interval, "coordinator started");
        Ok(outcome)
    }

    /// Cancel background work and wait for it to finish.
    ///
    /// In-flight refreshes and sends are abandoned: they return
    /// [`CoreError::CoordinatorShutdown`], publish nothing, and leave the
    /// snapshot untouched.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        self.inner.state.send_replace(CoordinatorState::Stopped);
        debug!(coordinator = %self.inner.name, "coordinator stopped");
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch devices once and publish the outcome.
    ///
    /// Refreshes are serialized per coordinator. Only a successful fetch
    /// replaces the snapshot; a timeout or connectivity error is reported
    /// as [`RefreshOutcome::TransientFailure`] and the old data stays.
    ///
    /// [`CoordinatorState::AuthFailed`] is sticky: a later successful
    /// manual refresh publishes [`RefreshEvent::Updated`] but neither
    /// clears the state nor restarts polling.
    pub async fn refresh(&self) -> Result<RefreshOutcome, CoreError> {
        let inner = &self.inner;

        let _guard = tokio::select! {
            biased;
            () = inner.cancel.cancelled() => return Err(CoreError::CoordinatorShutdown),
            guard = inner.refresh_lock.lock() => guard,
        };

        let fetch = with_deadline(inner.config.fetch_timeout, inner.fetcher.fetch_devices());
        let result = tokio::select! {
            biased;
            () = inner.cancel.cancelled() => {
                debug!(coordinator = %inner.name, "refresh abandoned");
                return Err(CoreError::CoordinatorShutdown);
            }
            result = fetch => result,
        };

        let outcome = match result {
            Ok(Ok(snapshot)) => {
                let snapshot = Arc::new(snapshot);
                inner.store.replace(Arc::clone(&snapshot));
                debug!(coordinator = %inner.name, devices = snapshot.len(), "refresh complete");
                RefreshOutcome::Success(snapshot)
            }
            Ok(Err(FetchError::Authentication { reason })) => {
                error!(coordinator = %inner.name, %reason, "credentials rejected, polling halted");
                RefreshOutcome::AuthFailure { reason }
            }
            Ok(Err(e @ FetchError::Connectivity { .. })) => {
                warn!(coordinator = %inner.name, error = %e, "refresh failed, keeping previous data");
                RefreshOutcome::TransientFailure {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                warn!(coordinator = %inner.name, error = %e, "refresh timed out, keeping previous data");
                RefreshOutcome::TransientFailure {
                    reason: e.to_string(),
                }
            }
        };

        self.publish(&outcome);
        Ok(outcome)
    }

    fn publish(&self, outcome: &RefreshOutcome) {
        let event = match outcome {
            RefreshOutcome::Success(snapshot) => RefreshEvent::Updated(Arc::clone(snapshot)),
            RefreshOutcome::TransientFailure { reason } => RefreshEvent::Stale {
                reason: reason.clone(),
            },
            RefreshOutcome::AuthFailure { reason } => {
                self.inner.state.send_replace(CoordinatorState::AuthFailed {
                    reason: reason.clone(),
                });
                RefreshEvent::ReauthRequired {
                    reason: reason.clone(),
                }
            }
        };
        // Nobody listening is fine.
        let _ = self.inner.events.send(event);
    }

    // ── Messaging ────────────────────────────────────────────────

    /// Resolve `request.targets` against the current snapshot and send.
    ///
    /// Reads the snapshot but never writes it, so sends may run alongside
    /// a refresh or each other.
    pub async fn send_message(&self, request: DispatchRequest) -> Result<DispatchOutcome, CoreError> {
        let inner = &self.inner;
        let snapshot = self.current_snapshot();
        let device_ids = DeviceResolver::new(&snapshot).resolve(&request.targets);
        let sender = request
            .sender
            .as_deref()
            .unwrap_or(&inner.config.default_sender);

        let dispatch = inner.dispatcher.dispatch(device_ids, &request.message, sender);
        tokio::select! {
            biased;
            () = inner.cancel.cancelled() => Err(CoreError::CoordinatorShutdown),
            outcome = dispatch => Ok(outcome),
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Refresh every `period` while someone is subscribed.
///
/// Holds the coordinator weakly and ends once the last [`Coordinator`]
/// handle is dropped. Shutdown and a credential rejection also stop it.
async fn poll_task(
    handle: Weak<CoordinatorInner>,
    cancel: CancellationToken,
    name: String,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Some(inner) = handle.upgrade() else { break };
                let coordinator = Coordinator { inner };
                if matches!(coordinator.current_state(), CoordinatorState::AuthFailed { .. }) {
                    break;
                }
                if coordinator.subscriber_count() == 0 {
                    trace!(coordinator = %name, "no subscribers, skipping refresh");
                } else {
                    match coordinator.refresh().await {
                        Ok(RefreshOutcome::AuthFailure { .. }) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
            }
        }
    }

    debug!(coordinator = %name, "polling stopped");
}
