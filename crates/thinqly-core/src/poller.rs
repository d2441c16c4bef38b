// ── Refresh scheduler ──
//
// One long-lived background loop rebuilds the cache: once immediately
// at startup, then every interval measured from the *end* of the
// previous cycle (a cancellable sleep, not a fixed-rate timer, so a
// slow cycle can't stack triggers). Forced refreshes arrive through a
// Notify and are dropped outright while a cycle is in flight.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::homes::HomesStore;
use crate::model::FleetSnapshot;
use crate::pipeline::build_fleet_snapshot;
use crate::remote::RemoteApi;
use crate::store::{CacheMeta, StatusCache};

/// Default time between refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(180);

/// The scheduler and the cache it maintains, as one handle.
///
/// Cheaply cloneable via `Arc`; the HTTP front end holds a clone for
/// reads and force-refresh requests while the background loop runs.
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    cache: Arc<StatusCache>,
    homes: Arc<dyn HomesStore>,
    remote: Arc<dyn RemoteApi>,
    force: Notify,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    /// Create a poller. Does NOT start the background loop -- call
    /// [`start()`](Self::start).
    pub fn new(
        homes: Arc<dyn HomesStore>,
        remote: Arc<dyn RemoteApi>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                cache: Arc::new(StatusCache::new(refresh_interval)),
                homes,
                remote,
                force: Notify::new(),
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    /// Access the underlying cache.
    pub fn cache(&self) -> Arc<StatusCache> {
        Arc::clone(&self.inner.cache)
    }

    /// Non-blocking cache read; see [`StatusCache::snapshot_with_meta`].
    pub fn snapshot_with_meta(&self) -> (Arc<FleetSnapshot>, CacheMeta) {
        self.inner.cache.snapshot_with_meta()
    }

    /// Spawn the background refresh loop. The first cycle starts
    /// immediately; this does not wait for it to finish.
    pub async fn start(&self) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(refresh_loop(inner));
        *self.inner.task.lock().await = Some(handle);
    }

    /// Fire-and-forget refresh trigger. Never blocks the caller, and a
    /// trigger arriving while a refresh is in flight is dropped rather
    /// than queued: the loop discards any permit stored during a cycle
    /// before it starts waiting again.
    pub fn request_refresh(&self) {
        self.inner.force.notify_one();
    }

    /// Run one full refresh cycle to completion on the caller's task.
    /// Does nothing if a cycle is already in flight.
    pub async fn refresh_once(&self) {
        run_cycle(&self.inner).await;
    }

    /// Signal the loop to exit and wait for it. An in-flight cycle is
    /// allowed to finish; the cache is never left mid-write.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
    }
}

async fn refresh_loop(inner: Arc<PollerInner>) {
    // Startup refresh, before the first wait.
    run_cycle(&inner).await;

    loop {
        // Triggers that landed during the cycle above left a stored
        // permit; consume it so they don't queue an extra cycle.
        if inner.force.notified().now_or_never().is_some() {
            debug!("refresh trigger arrived mid-cycle; dropped");
        }

        tokio::select! {
            biased;
            _ = inner.cancel.cancelled() => break,
            _ = inner.force.notified() => run_cycle(&inner).await,
            _ = tokio::time::sleep(inner.cache.refresh_interval()) => run_cycle(&inner).await,
        }
    }

    debug!("refresh loop stopped");
}

/// One refresh cycle: claim the slot, read config, build, publish.
///
/// Per-home and per-device failures are absorbed by the pipeline and
/// still count as a successful cycle. Only a homes-store read failure
/// takes the failure path, which keeps the previous snapshot.
async fn run_cycle(inner: &PollerInner) {
    if !inner.cache.begin_refresh() {
        return;
    }

    match inner.homes.list_homes().await {
        Ok(homes) => {
            let snapshot = build_fleet_snapshot(inner.remote.as_ref(), &homes).await;
            let total: usize = snapshot.homes.iter().map(|h| h.total_devices).sum();
            info!(
                homes = snapshot.homes.len(),
                devices = total,
                "fleet refresh complete"
            );
            inner.cache.complete_refresh(snapshot);
        }
        Err(e) => {
            let err = CoreError::from(e);
            warn!(error = %err, "fleet refresh failed; keeping previous snapshot");
            inner.cache.fail_refresh(err.to_string());
        }
    }
}
