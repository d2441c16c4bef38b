// ── Status cache ──
//
// Holds the last successfully built `FleetSnapshot` plus refresh
// metadata. The snapshot is published through an atomic pointer swap,
// so readers get a consistent, immutable view without ever waiting on
// a refresh in progress. The `updating` flag doubles as the
// at-most-one-refresh-in-flight guard: `begin_refresh` is a single
// test-and-set, so two triggers racing each other can't both win.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::FleetSnapshot;

/// Refresh metadata returned alongside every snapshot read.
///
/// Serde renames match the dashboard's `_meta` wire block.
#[derive(Debug, Clone, Serialize)]
pub struct CacheMeta {
    /// When the published snapshot was last replaced.
    #[serde(rename = "cache_ts")]
    pub cache_timestamp: Option<DateTime<Utc>>,
    pub updating: bool,
    pub last_error: Option<String>,
    #[serde(rename = "refresh_interval_sec")]
    pub refresh_interval_secs: u64,
    #[serde(rename = "last_success_iso")]
    pub last_success_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct MetaInner {
    cache_timestamp: Option<DateTime<Utc>>,
    last_error: Option<String>,
    last_success_at: Option<DateTime<Utc>>,
}

/// Process-wide cache of the aggregated fleet status.
///
/// Starts out holding the empty snapshot; `current` is only ever
/// replaced by a *successful* cycle. A failed cycle records its error
/// and leaves the published data untouched -- stale beats empty.
pub struct StatusCache {
    current: ArcSwap<FleetSnapshot>,
    updating: AtomicBool,
    meta: Mutex<MetaInner>,
    refresh_interval: Duration,
}

impl StatusCache {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            current: ArcSwap::from_pointee(FleetSnapshot::empty()),
            updating: AtomicBool::new(false),
            meta: Mutex::new(MetaInner::default()),
            refresh_interval,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Non-blocking read of the published snapshot and its metadata.
    /// Never observes a snapshot under construction.
    pub fn snapshot_with_meta(&self) -> (Arc<FleetSnapshot>, CacheMeta) {
        let snapshot = self.current.load_full();
        let inner = self.meta.lock().unwrap_or_else(PoisonError::into_inner);
        let meta = CacheMeta {
            cache_timestamp: inner.cache_timestamp,
            updating: self.is_updating(),
            last_error: inner.last_error.clone(),
            refresh_interval_secs: self.refresh_interval.as_secs(),
            last_success_at: inner.last_success_at,
        };
        (snapshot, meta)
    }

    /// Try to claim the refresh slot. Returns `false` when a refresh is
    /// already in flight; the caller must then do nothing.
    pub fn begin_refresh(&self) -> bool {
        self.updating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    /// Publish a successfully built snapshot and release the slot.
    pub fn complete_refresh(&self, snapshot: FleetSnapshot) {
        let now = Utc::now();
        self.current.store(Arc::new(snapshot));
        {
            let mut inner = self.meta.lock().unwrap_or_else(PoisonError::into_inner);
            inner.cache_timestamp = Some(now);
            inner.last_success_at = Some(now);
            inner.last_error = None;
        }
        self.updating.store(false, Ordering::Release);
    }

    /// Record a cycle-level failure and release the slot. The published
    /// snapshot and success timestamps stay exactly as they were.
    pub fn fail_refresh(&self, error: String) {
        {
            let mut inner = self.meta.lock().unwrap_or_else(PoisonError::into_inner);
            inner.last_error = Some(error);
        }
        self.updating.store(false, Ordering::Release);
    }
}
