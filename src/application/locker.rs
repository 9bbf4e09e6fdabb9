use super::locks::LockTable;
use crate::domain::account::Uid;
use std::future::Future;
use std::sync::Arc;

/// Takes the locks of two accounts in one global order.
///
/// The lock of the numerically smaller uid is always taken first, whatever
/// order the caller passes them in. With a single total order no two
/// transfers can wait on each other in a cycle.
pub struct OrderedLocker {
    locks: Arc<LockTable>,
}

impl OrderedLocker {
    pub fn new(locks: Arc<LockTable>) -> Self {
        Self { locks }
    }

    /// Runs `action` while both account locks are held.
    ///
    /// Returns `None` when either lock could not be acquired in time. If the
    /// second lock times out the first one is released before returning.
    /// Passing the same uid twice takes its lock once.
    pub async fn with_both_locked<F, Fut, T>(&self, a: Uid, b: Uid, action: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let locks: &LockTable = &self.locks;
        let first_key = first.to_string();

        if first == second {
            return locks.with_lock(&first_key, action).await;
        }

        let second_key = second.to_string();
        let second_key = second_key.as_str();
        locks
            .with_lock(&first_key, move || locks.with_lock(second_key, action))
            .await
            .flatten()
    }
}
