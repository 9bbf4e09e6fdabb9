use super::locker::OrderedLocker;
use super::registry::AccountRegistry;
use crate::domain::account::{Account, Uid};
use crate::domain::money::Money;
use crate::error::TransferError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A completed transfer: the amount moved and both accounts as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub source: Account,
    pub destination: Account,
    pub amount: Money,
}

/// Moves money between two accounts.
///
/// Feasibility is checked twice. First without locks, on possibly stale
/// snapshots, to reject hopeless requests cheaply. Then again under both
/// account locks on fresh snapshots, which is the check that counts. Both
/// balances are written while both locks are held, so nobody observes one
/// side of a transfer without the other.
pub struct TransferService {
    registry: Arc<AccountRegistry>,
    locker: OrderedLocker,
    retry_after: Duration,
}

impl TransferService {
    pub fn new(
        registry: Arc<AccountRegistry>,
        locker: OrderedLocker,
        retry_after: Duration,
    ) -> Self {
        Self {
            registry,
            locker,
            retry_after,
        }
    }

    /// Transfers `amount` from `source` to `destination`.
    ///
    /// `amount` is expected to be positive. [`TransferError::AccountBusy`]
    /// means the locks could not be taken in time and nothing was changed.
    pub async fn transfer(
        &self,
        source: Uid,
        destination: Uid,
        amount: Money,
    ) -> Result<Transfer, TransferError> {
        let src = self.registry.get(source).await?;
        let dst = self.registry.get(destination).await?;
        info!(%source, %destination, %amount, "transfer requested");

        if let Err(error) = self.check_possible(&src, &dst, &amount) {
            warn!(%source, %destination, %amount, %error, "transfer is not possible");
            return Err(error);
        }

        self.locker
            .with_both_locked(source, destination, move || {
                self.transfer_under_lock(source, destination, amount)
            })
            .await
            .unwrap_or_else(|| {
                warn!(%source, %destination, "failed to obtain account locks");
                Err(TransferError::AccountBusy {
                    retry_after: self.retry_after,
                })
            })
    }

    async fn transfer_under_lock(
        &self,
        source: Uid,
        destination: Uid,
        amount: Money,
    ) -> Result<Transfer, TransferError> {
        let src = self.registry.get(source).await?;
        let dst = self.registry.get(destination).await?;

        let (src_balance, dst_balance) = match self.check_allowable(&src, &dst, &amount) {
            Ok(balances) => balances,
            Err(error) => {
                warn!(%source, %destination, %amount, %error, "transfer was not allowed");
                return Err(error);
            }
        };

        // A self-transfer nets to zero; writing both sides would credit the account.
        if source == destination {
            return Ok(Transfer {
                source: src.clone(),
                destination: dst,
                amount,
            });
        }

        let src = self.registry.update(&src, src_balance).await;
        let dst = self.registry.update(&dst, dst_balance).await;
        info!(
            %source,
            %destination,
            %amount,
            source_balance = %src.balance(),
            destination_balance = %dst.balance(),
            "money transferred"
        );
        Ok(Transfer {
            source: src,
            destination: dst,
            amount,
        })
    }

    fn check_possible(
        &self,
        src: &Account,
        dst: &Account,
        amount: &Money,
    ) -> Result<(), TransferError> {
        if src.balance().currency() != dst.balance().currency() {
            return Err(TransferError::AccountsCurrenciesNotSame);
        }
        if src.balance().currency() != amount.currency() {
            return Err(TransferError::AmountCurrencyMismatch);
        }
        self.check_allowable(src, dst, amount).map(|_| ())
    }

    /// New balances for both sides, if both stay within bounds.
    fn check_allowable(
        &self,
        src: &Account,
        dst: &Account,
        amount: &Money,
    ) -> Result<(Money, Money), TransferError> {
        let src_balance = src
            .balance()
            .checked_sub(amount.amount())
            .filter(|balance| self.registry.is_allowable(balance.amount()))
            .ok_or(TransferError::InsufficientSourceBalance)?;
        let dst_balance = dst
            .balance()
            .checked_add(amount.amount())
            .filter(|balance| self.registry.is_allowable(balance.amount()))
            .ok_or(TransferError::DestinationBalanceOverflow)?;
        Ok((src_balance, dst_balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::locks::LockTable;
    use crate::domain::money::Currency;
    use crate::error::AccountNotFound;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        registry: Arc<AccountRegistry>,
        locks: Arc<LockTable>,
        service: TransferService,
    }

    fn fixture(max_balance: Decimal) -> Fixture {
        let registry = Arc::new(AccountRegistry::new(
            Box::new(InMemoryAccountStore::new()),
            dec!(0),
            max_balance,
        ));
        let locks = Arc::new(LockTable::new(
            Duration::from_millis(50),
            Duration::from_secs(60),
        ));
        let service = TransferService::new(
            Arc::clone(&registry),
            OrderedLocker::new(Arc::clone(&locks)),
            Duration::from_millis(100),
        );
        Fixture {
            registry,
            locks,
            service,
        }
    }

    fn money(amount: Decimal, currency: Currency) -> Money {
        Money::new(amount, currency).unwrap()
    }

    fn usd(amount: Decimal) -> Money {
        money(amount, Currency::Usd)
    }

    async fn balance(registry: &AccountRegistry, uid: Uid) -> Money {
        registry.get(uid).await.unwrap().balance()
    }

    #[tokio::test]
    async fn test_transfer_moves_money() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(100.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(0.00))).await.unwrap().uid();

        let transfer = f.service.transfer(src, dst, usd(dec!(30.00))).await.unwrap();

        assert_eq!(transfer.source.balance(), usd(dec!(70.00)));
        assert_eq!(transfer.destination.balance(), usd(dec!(30.00)));
        assert_eq!(balance(&f.registry, src).await.to_string(), "70.00 USD");
        assert_eq!(balance(&f.registry, dst).await.to_string(), "30.00 USD");
    }

    #[tokio::test]
    async fn test_insufficient_source_balance() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(0.00))).await.unwrap().uid();

        let result = f.service.transfer(src, dst, usd(dec!(20.00))).await;

        assert_eq!(result, Err(TransferError::InsufficientSourceBalance));
        assert_eq!(balance(&f.registry, src).await, usd(dec!(10.00)));
        assert_eq!(balance(&f.registry, dst).await, usd(dec!(0.00)));
    }

    #[tokio::test]
    async fn test_destination_balance_overflow() {
        let f = fixture(dec!(100));
        let src = f.registry.create(usd(dec!(50.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(90.00))).await.unwrap().uid();

        let result = f.service.transfer(src, dst, usd(dec!(20.00))).await;

        assert_eq!(result, Err(TransferError::DestinationBalanceOverflow));
        assert_eq!(balance(&f.registry, src).await, usd(dec!(50.00)));
        assert_eq!(balance(&f.registry, dst).await, usd(dec!(90.00)));
    }

    #[tokio::test]
    async fn test_transfer_to_max_balance_exactly() {
        let f = fixture(dec!(100));
        let src = f.registry.create(usd(dec!(50.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(90.00))).await.unwrap().uid();

        assert!(f.service.transfer(src, dst, usd(dec!(10.00))).await.is_ok());
        assert_eq!(balance(&f.registry, dst).await, usd(dec!(100.00)));
        assert_eq!(balance(&f.registry, src).await, usd(dec!(40.00)));
    }

    #[tokio::test]
    async fn test_accounts_currencies_not_same() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();
        let dst = f
            .registry
            .create(money(dec!(10.00), Currency::Eur))
            .await
            .unwrap()
            .uid();

        let result = f.service.transfer(src, dst, usd(dec!(1.00))).await;

        assert_eq!(result, Err(TransferError::AccountsCurrenciesNotSame));
    }

    #[tokio::test]
    async fn test_amount_currency_mismatch() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();

        let result = f
            .service
            .transfer(src, dst, money(dec!(1.00), Currency::Rub))
            .await;

        assert_eq!(result, Err(TransferError::AmountCurrencyMismatch));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();
        let missing = Uid::new(42).unwrap();

        let result = f.service.transfer(src, missing, usd(dec!(1.00))).await;

        assert_eq!(
            result,
            Err(TransferError::AccountNotFound(AccountNotFound(missing)))
        );
    }

    #[tokio::test]
    async fn test_busy_account_reports_retry() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(0.00))).await.unwrap().uid();

        let key = dst.to_string();
        let result = f
            .locks
            .with_lock(&key, || f.service.transfer(src, dst, usd(dec!(1.00))))
            .await
            .unwrap();

        assert_eq!(
            result,
            Err(TransferError::AccountBusy {
                retry_after: Duration::from_millis(100)
            })
        );
        assert!(result.unwrap_err().is_retryable());
        assert_eq!(balance(&f.registry, src).await, usd(dec!(10.00)));
        assert_eq!(balance(&f.registry, dst).await, usd(dec!(0.00)));
    }

    #[tokio::test]
    async fn test_stale_precheck_is_caught_under_lock() {
        let f = fixture(dec!(1000));
        let src = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();
        let dst = f.registry.create(usd(dec!(0.00))).await.unwrap().uid();

        // The source is drained between the unlocked pre-check and the locked re-check.
        let result = f
            .service
            .locker
            .with_both_locked(src, dst, || async {
                let account = f.registry.get(src).await.unwrap();
                f.registry.update(&account, usd(dec!(0.00))).await;
                f.service.transfer_under_lock(src, dst, usd(dec!(5.00))).await
            })
            .await
            .unwrap();

        assert_eq!(result, Err(TransferError::InsufficientSourceBalance));
        assert_eq!(balance(&f.registry, dst).await, usd(dec!(0.00)));
    }

    #[tokio::test]
    async fn test_self_transfer_changes_nothing() {
        let f = fixture(dec!(1000));
        let uid = f.registry.create(usd(dec!(10.00))).await.unwrap().uid();

        assert!(f.service.transfer(uid, uid, usd(dec!(4.00))).await.is_ok());
        assert_eq!(balance(&f.registry, uid).await, usd(dec!(10.00)));
    }
}
