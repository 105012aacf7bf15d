//! TTL cache over a snapshot source with a single-flight refresh guard.
//!
//! At most one refresh is in flight. Readers arriving while it runs get the
//! previous snapshot, or wait for the first one if nothing has been fetched
//! yet. The refresh itself runs on a spawned task and always settles the
//! slot, even if the caller that triggered it goes away.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::sync::Notify;
use tokio::time::Instant;

use super::refresh_model::{RefreshStatus, SlotState, Snapshot};
use super::refresh_traits::SnapshotSource;
use crate::errors::{Error, Result};

/// A committed snapshot and when it was committed.
struct CacheEntry {
    snapshot: Arc<Snapshot>,
    refreshed_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.refreshed_at.elapsed() < ttl
    }
}

#[derive(Default)]
struct Slot {
    entry: Option<CacheEntry>,
    refreshing: bool,
    last_error: Option<String>,
}

struct Inner {
    source: Arc<dyn SnapshotSource>,
    ttl: Duration,
    slot: Mutex<Slot>,
    /// Signalled whenever a refresh settles.
    settled: Notify,
}

impl Inner {
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| {
            warn!("Refresh cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Stores the outcome of a refresh and wakes any waiters. A failed
    /// refresh keeps the previous snapshot and its timestamp.
    fn commit(&self, result: Result<Snapshot>) -> Result<Arc<Snapshot>> {
        let outcome = {
            let mut slot = self.lock_slot();
            slot.refreshing = false;
            match result {
                Ok(snapshot) => {
                    let snapshot = Arc::new(snapshot);
                    slot.entry = Some(CacheEntry {
                        snapshot: Arc::clone(&snapshot),
                        refreshed_at: Instant::now(),
                    });
                    slot.last_error = None;
                    Ok(snapshot)
                }
                Err(e) => {
                    let message = e.to_string();
                    error!("Refresh failed: {}", message);
                    slot.last_error = Some(message.clone());
                    match &slot.entry {
                        Some(entry) => Ok(Arc::clone(&entry.snapshot)),
                        None => Err(Error::Refresh(message)),
                    }
                }
            }
        };
        self.settled.notify_waiters();
        outcome
    }
}

/// Shared handle to the snapshot cache. Cloning is cheap.
#[derive(Clone)]
pub struct RefreshCache {
    inner: Arc<Inner>,
}

impl RefreshCache {
    pub fn new(source: Arc<dyn SnapshotSource>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                ttl,
                slot: Mutex::new(Slot::default()),
                settled: Notify::new(),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Returns the current snapshot, refreshing it first if it is stale.
    ///
    /// While another refresh is running this returns the previous snapshot
    /// immediately. With no previous snapshot it waits for that refresh to
    /// settle. Errors only when no snapshot has ever been produced.
    pub async fn get(&self) -> Result<Arc<Snapshot>> {
        let wait = {
            let mut slot = self.inner.lock_slot();
            if let Some(entry) = &slot.entry {
                if slot.refreshing || entry.is_fresh(self.inner.ttl) {
                    return Ok(Arc::clone(&entry.snapshot));
                }
            }

            if slot.refreshing {
                // Registered under the lock so the settle cannot be missed.
                Some(self.inner.settled.notified())
            } else {
                slot.refreshing = true;
                None
            }
        };

        match wait {
            Some(notified) => {
                debug!("Waiting for the first refresh to settle");
                notified.await;
                self.settled_result()
            }
            None => self.refresh().await,
        }
    }

    /// The cached snapshot, without triggering any I/O.
    pub fn peek(&self) -> Option<Arc<Snapshot>> {
        self.inner
            .lock_slot()
            .entry
            .as_ref()
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    pub fn status(&self) -> RefreshStatus {
        let slot = self.inner.lock_slot();
        if slot.refreshing {
            RefreshStatus::Fetching
        } else if let Some(message) = &slot.last_error {
            RefreshStatus::Error(message.clone())
        } else {
            RefreshStatus::Idle
        }
    }

    pub fn state(&self) -> SlotState {
        let slot = self.inner.lock_slot();
        match &slot.entry {
            _ if slot.refreshing => SlotState::Refreshing,
            None => SlotState::Empty,
            Some(entry) if entry.is_fresh(self.inner.ttl) => SlotState::Fresh,
            Some(_) => SlotState::Stale,
        }
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.peek().map(|snapshot| snapshot.fetched_at)
    }

    fn settled_result(&self) -> Result<Arc<Snapshot>> {
        let slot = self.inner.lock_slot();
        match (&slot.entry, &slot.last_error) {
            (Some(entry), _) => Ok(Arc::clone(&entry.snapshot)),
            (None, Some(message)) => Err(Error::Refresh(message.clone())),
            (None, None) => Err(Error::Unexpected(
                "refresh settled without a snapshot".to_string(),
            )),
        }
    }

    async fn refresh(&self) -> Result<Arc<Snapshot>> {
        info!("Refreshing snapshot");
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = match AssertUnwindSafe(inner.source.load_snapshot())
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(payload) => Err(Error::Refresh(panic_message(payload))),
            };
            inner.commit(result)
        });

        task.await
            .map_err(|e| Error::Unexpected(format!("Refresh task failed: {}", e)))?
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("refresh panicked: {}", detail)
}
