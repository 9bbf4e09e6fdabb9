use crate::domain::account::{Account, Uid};
use crate::domain::ports::AccountStore;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

/// A thread-safe in-memory store for account snapshots.
///
/// Backed by a sharded `DashMap`, so a `put` on one account never blocks a
/// `get` on another. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<Uid, Account>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn put(&self, account: Account) {
        let uid = account.uid();
        self.accounts.insert(uid, account);
        debug!(%uid, "account saved");
    }

    async fn get(&self, uid: Uid) -> Option<Account> {
        self.accounts.get(&uid).map(|entry| entry.value().clone())
    }

    async fn all(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(Account::uid);
        accounts
    }
}
