use crate::domain::account::{Account, Uid};
use crate::domain::money::Money;
use crate::domain::ports::AccountStoreBox;
use crate::error::{AccountNotFound, CreateAccountError};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Identifiers are minted from here upwards; the first account gets `1000000001`.
const UID_SEED: u64 = 1_000_000_000;

/// Owns account creation, lookups and balance replacement.
///
/// This is the only component that mints uids and the only sanctioned way
/// to change a balance. It enforces `min_balance <= balance <= max_balance`
/// at creation; transfers reuse [`AccountRegistry::is_allowable`] for their
/// own checks.
pub struct AccountRegistry {
    store: AccountStoreBox,
    uid_generator: AtomicU64,
    min_balance: Decimal,
    max_balance: Decimal,
}

impl AccountRegistry {
    pub fn new(store: AccountStoreBox, min_balance: Decimal, max_balance: Decimal) -> Self {
        Self {
            store,
            uid_generator: AtomicU64::new(UID_SEED),
            min_balance,
            max_balance,
        }
    }

    pub async fn create(&self, balance: Money) -> Result<Account, CreateAccountError> {
        info!(%balance, "creating account");
        if !self.is_allowable(balance.amount()) {
            warn!(%balance, "balance is out of bounds, account not created");
            return Err(CreateAccountError::BalanceTooHigh);
        }

        let account = Account::new(self.next_uid(), balance, Utc::now());
        self.store.put(account.clone()).await;
        info!(uid = %account.uid(), %balance, "account created");
        Ok(account)
    }

    /// Whether `amount` lies within the configured balance bounds.
    pub fn is_allowable(&self, amount: Decimal) -> bool {
        amount >= self.min_balance && amount <= self.max_balance
    }

    pub async fn find(&self, uid: Uid) -> Option<Account> {
        self.store.get(uid).await
    }

    /// Like [`AccountRegistry::find`], for callers that already know the account exists.
    pub async fn get(&self, uid: Uid) -> Result<Account, AccountNotFound> {
        self.find(uid).await.ok_or(AccountNotFound(uid))
    }

    /// Stores a copy of `account` carrying `balance` and returns it.
    pub async fn update(&self, account: &Account, balance: Money) -> Account {
        let updated = account.with_balance(balance);
        self.store.put(updated.clone()).await;
        updated
    }

    pub async fn accounts(&self) -> Vec<Account> {
        self.store.all().await
    }

    fn next_uid(&self) -> Uid {
        Uid::minted(self.uid_generator.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
