//! Registry observer: surfaces each volume record exactly once.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::runtime::types::VolumeRecord;
use crate::store::VolumeStore;

/// Channel depth between the poller and its consumer.
const BATCH_CHANNEL_CAPACITY: usize = 16;

/// Shortest poll interval; tokio intervals must have a non-zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Tracks which record names have already been handed out.
///
/// The seen-set lives in the instance, so two observers over the same store
/// each surface every record once.
pub struct RegistryObserver {
    store: Arc<dyn VolumeStore>,
    seen: Mutex<HashSet<String>>,
}

impl RegistryObserver {
    pub fn new(store: Arc<dyn VolumeStore>) -> Self {
        Self {
            store,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Records that appeared since the previous refresh, in store order.
    ///
    /// A store failure leaves the seen-set untouched, so the records are
    /// surfaced by a later refresh instead.
    pub fn refresh(&self) -> ObsdiskResult<Vec<VolumeRecord>> {
        let records = self.store.list_all()?;

        let mut seen = self.seen.lock();
        let fresh: Vec<VolumeRecord> = records
            .into_iter()
            .filter(|record| seen.insert(record.name.clone()))
            .collect();

        if !fresh.is_empty() {
            tracing::debug!(count = fresh.len(), total = seen.len(), "New volumes observed");
        }

        Ok(fresh)
    }

    /// Number of distinct names surfaced so far.
    pub fn seen_count(&self) -> usize {
        self.seen.lock().len()
    }
}

/// Handle to a background task that refreshes an observer on a fixed interval.
///
/// Non-empty batches and store errors are delivered through the receiver
/// returned by [`RegistryPoller::spawn`]. The task ends when [`stop`] is
/// called, when the handle is dropped, or when the receiver is dropped.
///
/// [`stop`]: RegistryPoller::stop
pub struct RegistryPoller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl RegistryPoller {
    /// Start polling. Must be called within a tokio runtime.
    ///
    /// Intervals shorter than 1ms, including zero, are raised to 1ms.
    pub fn spawn(
        observer: Arc<RegistryObserver>,
        interval: Duration,
    ) -> (Self, mpsc::Receiver<ObsdiskResult<Vec<VolumeRecord>>>) {
        let (tx, rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let interval = interval.max(MIN_POLL_INTERVAL);

        let handle = tokio::spawn(poll_loop(observer, interval, tx, cancel.clone()));

        (
            Self {
                cancel,
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Cancel the schedule and wait for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Registry poller task ended abnormally");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }
}

impl Drop for RegistryPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    observer: Arc<RegistryObserver>,
    interval: Duration,
    tx: mpsc::Sender<ObsdiskResult<Vec<VolumeRecord>>>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(interval_ms = interval.as_millis() as u64, "Registry poller started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tx.closed() => break,
            _ = ticker.tick() => {}
        }

        let observer = Arc::clone(&observer);
        let result = tokio::task::spawn_blocking(move || observer.refresh())
            .await
            .unwrap_or_else(|e| Err(ObsdiskError::internal(e)));

        let batch = match result {
            Ok(records) if records.is_empty() => continue,
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(error = %e, "Registry refresh failed");
                Err(e)
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = tx.send(batch) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Registry poller stopped");
}
