//! Per-grill status cache.
//!
//! All adapters for one grill share a single cache: `refresh` replaces the
//! snapshot wholesale under a write lock, readers copy it out under a read
//! lock, and every refresh fans out over a broadcast channel. Adapters
//! never observe a torn or partially updated record.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::device::GrillDevice;
use crate::error::Result;
use crate::status::StatusSnapshot;

/// Callback handle for unregistering callbacks.
pub struct CallbackHandle {
    id: u64,
    unregister_fn: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl CallbackHandle {
    /// Create a new callback handle.
    pub(crate) fn new(id: u64, unregister_fn: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            id,
            unregister_fn: Some(Box::new(unregister_fn)),
        }
    }

    /// Unregister this callback.
    pub fn unregister(mut self) {
        if let Some(f) = self.unregister_fn.take() {
            f();
        }
    }

    /// Get the callback ID.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for CallbackHandle {
    fn drop(&mut self) {
        if let Some(f) = self.unregister_fn.take() {
            f();
        }
    }
}

/// Shared, single-writer snapshot cache for one grill.
pub struct StatusCache {
    /// Device handle to poll.
    device: Arc<dyn GrillDevice>,
    /// The authoritative snapshot.
    snapshot: RwLock<StatusSnapshot>,
    /// Refresh fan-out channel.
    update_tx: broadcast::Sender<StatusSnapshot>,
    /// Callback ID counter.
    callback_counter: AtomicU64,
}

impl StatusCache {
    /// Create a cache for one grill, primed with an initial status read.
    pub async fn new(device: Arc<dyn GrillDevice>) -> Result<Self> {
        let snapshot = device.status().await?;
        let (update_tx, _) = broadcast::channel(16);

        Ok(Self {
            device,
            snapshot: RwLock::new(snapshot),
            update_tx,
            callback_counter: AtomicU64::new(0),
        })
    }

    /// Poll the grill and replace the snapshot wholesale.
    ///
    /// Transport failures propagate and leave the previous snapshot in
    /// place. Concurrent refreshes serialize on the write lock; the last
    /// write wins.
    pub async fn refresh(&self) -> Result<()> {
        let snapshot = self.device.status().await?;
        debug!("state: {:?}", snapshot);

        *self.snapshot.write() = snapshot;
        let _ = self.update_tx.send(snapshot);

        Ok(())
    }

    /// Copy out the current snapshot.
    pub fn snapshot(&self) -> StatusSnapshot {
        *self.snapshot.read()
    }

    /// Subscribe to refreshed snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusSnapshot> {
        self.update_tx.subscribe()
    }

    /// Register a callback invoked on every refresh.
    pub fn on_refresh<F>(&self, callback: F) -> CallbackHandle
    where
        F: Fn(&StatusSnapshot) + Send + Sync + 'static,
    {
        let callback_id = self.callback_counter.fetch_add(1, Ordering::SeqCst);
        let mut rx = self.update_tx.subscribe();

        let handle = tokio::spawn(async move {
            while let Ok(snapshot) = rx.recv().await {
                callback(&snapshot);
            }
        });

        CallbackHandle::new(callback_id, move || {
            handle.abort();
        })
    }
}

impl std::fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCache")
            .field("serial_number", &self.device.serial_number())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MockGrillDevice;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn snapshot_at(temp: u16) -> StatusSnapshot {
        StatusSnapshot {
            on: 1,
            temp,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_new_primes_snapshot() {
        let mut mock = MockGrillDevice::new();
        mock.expect_status()
            .times(1)
            .returning(|| Ok(snapshot_at(150)));

        let cache = StatusCache::new(Arc::new(mock)).await.unwrap();
        assert_eq!(cache.snapshot().temp, 150);
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockGrillDevice::new();
        mock.expect_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(snapshot_at(150)));
        mock.expect_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                Ok(StatusSnapshot {
                    on: 2,
                    temp: 200,
                    ..Default::default()
                })
            });

        let cache = StatusCache::new(Arc::new(mock)).await.unwrap();
        cache.refresh().await.unwrap();

        // Nothing of the old snapshot survives the replacement
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.on, 2);
        assert_eq!(snapshot.temp, 200);
    }

    #[tokio::test]
    async fn test_refresh_error_keeps_previous_snapshot() {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockGrillDevice::new();
        mock.expect_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(snapshot_at(150)));
        mock.expect_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                Err(Error::Timeout {
                    operation: "status".to_string(),
                })
            });

        let cache = StatusCache::new(Arc::new(mock)).await.unwrap();
        let result = cache.refresh().await;

        assert!(result.is_err());
        assert_eq!(cache.snapshot().temp, 150);
    }

    #[tokio::test]
    async fn test_refresh_fans_out() {
        let mut mock = MockGrillDevice::new();
        mock.expect_status().returning(|| Ok(snapshot_at(225)));

        let cache = StatusCache::new(Arc::new(mock)).await.unwrap();
        let mut rx = cache.subscribe();

        cache.refresh().await.unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.temp, 225);
    }
}
