use super::locker::OrderedLocker;
use super::locks::LockTable;
use super::registry::AccountRegistry;
use super::transfer::{Transfer, TransferService};
use crate::config::LedgerConfig;
use crate::domain::account::{Account, Uid};
use crate::domain::money::Money;
use crate::domain::ports::AccountStoreBox;
use crate::error::{AccountNotFound, CreateAccountError, TransferError};
use crate::infrastructure::in_memory::InMemoryAccountStore;
use std::sync::Arc;

/// The ledger core, wired together.
///
/// Cheap to clone; clones share the same accounts and locks.
#[derive(Clone)]
pub struct Ledger {
    registry: Arc<AccountRegistry>,
    locks: Arc<LockTable>,
    transfers: Arc<TransferService>,
}

impl Ledger {
    /// Creates a ledger backed by an in-memory store.
    pub fn new(config: &LedgerConfig) -> Self {
        Self::with_store(config, Box::new(InMemoryAccountStore::new()))
    }

    pub fn with_store(config: &LedgerConfig, store: AccountStoreBox) -> Self {
        let registry = Arc::new(AccountRegistry::new(
            store,
            config.min_balance,
            config.max_balance,
        ));
        let locks = Arc::new(LockTable::new(config.lock_wait, config.lock_idle_timeout));
        let transfers = Arc::new(TransferService::new(
            Arc::clone(&registry),
            OrderedLocker::new(Arc::clone(&locks)),
            config.retry_after,
        ));
        Self {
            registry,
            locks,
            transfers,
        }
    }

    pub async fn create_account(&self, balance: Money) -> Result<Account, CreateAccountError> {
        self.registry.create(balance).await
    }

    /// Current balance. Reads a snapshot and takes no lock.
    pub async fn balance(&self, uid: Uid) -> Result<Money, AccountNotFound> {
        self.registry.get(uid).await.map(|account| account.balance())
    }

    pub async fn find_account(&self, uid: Uid) -> Option<Account> {
        self.registry.find(uid).await
    }

    pub async fn transfer(
        &self,
        source: Uid,
        destination: Uid,
        amount: Money,
    ) -> Result<Transfer, TransferError> {
        self.transfers.transfer(source, destination, amount).await
    }

    pub async fn accounts(&self) -> Vec<Account> {
        self.registry.accounts().await
    }

    /// Number of account locks currently kept in the lock table.
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }
}
