use crate::domain::account::Uid;
use crate::domain::money::Currency;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Account was not found: uid={0}")]
pub struct AccountNotFound(pub Uid);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("UID value is invalid: {0:?}")]
pub struct InvalidUid(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency is not supported: {0}")]
    UnsupportedCurrency(String),
    #[error("{currency} amount must have {expected} decimal places")]
    Precision { currency: Currency, expected: u32 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAccountError {
    #[error("Balance is too high")]
    BalanceTooHigh,
}

/// Terminal outcomes of a rejected transfer.
///
/// Everything except [`TransferError::AccountBusy`] is deterministic and
/// must not be retried. `AccountBusy` is lock contention: the caller may try
/// again after `retry_after`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    #[error("Currencies of given accounts differs from each other")]
    AccountsCurrenciesNotSame,
    #[error("Currency of amount to transfer differs from requested accounts")]
    AmountCurrencyMismatch,
    #[error("Insufficient balance on source account")]
    InsufficientSourceBalance,
    #[error("Destination balance limit will be exceeded")]
    DestinationBalanceOverflow,
    #[error("Account is busy, retry after {retry_after:?}")]
    AccountBusy { retry_after: Duration },
    #[error(transparent)]
    AccountNotFound(#[from] AccountNotFound),
}

impl TransferError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransferError::AccountBusy { .. })
    }
}
