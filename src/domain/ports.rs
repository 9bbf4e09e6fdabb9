use super::account::{Account, Uid};
use async_trait::async_trait;

/// Keyed storage of account snapshots.
///
/// Single-key reads and writes are atomic, nothing more. There is no
/// read-modify-write: a caller that derives a new balance from a read must
/// hold that account's lock from the lock table across both calls.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Unconditional upsert keyed by the account's uid.
    async fn put(&self, account: Account);
    async fn get(&self, uid: Uid) -> Option<Account>;
    /// Every stored snapshot, ordered by uid.
    async fn all(&self) -> Vec<Account>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
