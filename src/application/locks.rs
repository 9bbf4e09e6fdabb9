use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct LockEntry {
    lock: Arc<Mutex<()>>,
    last_access: Instant,
}

/// A bounded table of named mutual-exclusion locks.
///
/// Locks are created on first use and dropped again once nobody holds or
/// waits on them and they have been idle for `idle_timeout`. Memory is
/// therefore proportional to recently active keys. An evicted key gets a
/// fresh lock on its next use.
pub struct LockTable {
    locks: DashMap<String, LockEntry>,
    wait: Duration,
    idle_timeout: Duration,
    epoch: Instant,
    last_sweep_ms: AtomicU64,
}

impl LockTable {
    pub fn new(wait: Duration, idle_timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            wait,
            idle_timeout,
            epoch: Instant::now(),
            last_sweep_ms: AtomicU64::new(0),
        }
    }

    /// Runs `action` while holding the lock named `key`.
    ///
    /// Waits at most the configured bound for the lock. Returns `None` if the
    /// wait expires: the key is busy and the caller should try again later.
    /// The lock is released when `action` completes, or while unwinding if
    /// it panics.
    pub async fn with_lock<F, Fut, T>(&self, key: &str, action: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.maybe_evict();
        let lock = self.lock_for(key);

        let guard = match tokio::time::timeout(self.wait, lock.lock_owned()).await {
            Ok(guard) => guard,
            Err(_) => {
                debug!(key, wait = ?self.wait, "lock wait expired");
                return None;
            }
        };
        debug!(key, "lock acquired");

        let result = action().await;
        drop(guard);
        debug!(key, "lock released");
        Some(result)
    }

    /// Drops every lock that is neither held nor awaited and has been idle
    /// for longer than the idle timeout. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        self.locks.retain(|_, entry| {
            // The table's own handle is the only one left when nobody holds or awaits it.
            let in_use = Arc::strong_count(&entry.lock) > 1;
            let keep = in_use || now.duration_since(entry.last_access) < self.idle_timeout;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    // Insert-if-absent under the shard lock, so racing first accesses share one mutex.
    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut entry = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| LockEntry {
                lock: Arc::new(Mutex::new(())),
                last_access: Instant::now(),
            });
        entry.last_access = Instant::now();
        Arc::clone(&entry.lock)
    }

    // Sweeps at most once per idle period, from whichever caller gets there first.
    fn maybe_evict(&self) {
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        let last = self.last_sweep_ms.load(Ordering::Relaxed);
        if now_ms.saturating_sub(last) < self.idle_timeout.as_millis() as u64 {
            return;
        }
        if self
            .last_sweep_ms
            .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            let evicted = self.evict_idle();
            if evicted > 0 {
                debug!(evicted, remaining = self.len(), "evicted idle locks");
            }
        }
    }
}
