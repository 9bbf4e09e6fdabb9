use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Lowest balance an account may hold unless configured otherwise.
pub const DEFAULT_MIN_BALANCE: Decimal = Decimal::ZERO;
/// Highest balance an account may hold unless configured otherwise.
pub const DEFAULT_MAX_BALANCE: Decimal = dec!(1000000000000000000);
pub const DEFAULT_WORKERS: usize = 100;
/// How long a transfer waits for each account lock before reporting busy.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_millis(100);
/// An unheld lock with no access for this long is dropped from the table.
pub const DEFAULT_LOCK_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
/// Wait suggested to callers that got a busy outcome.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_millis(100);

/// Settings the ledger core is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub min_balance: Decimal,
    pub max_balance: Decimal,
    /// Worker pool size. Affects scheduling capacity only.
    pub workers: usize,
    pub lock_wait: Duration,
    pub lock_idle_timeout: Duration,
    pub retry_after: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_balance: DEFAULT_MIN_BALANCE,
            max_balance: DEFAULT_MAX_BALANCE,
            workers: DEFAULT_WORKERS,
            lock_wait: DEFAULT_LOCK_WAIT,
            lock_idle_timeout: DEFAULT_LOCK_IDLE_TIMEOUT,
            retry_after: DEFAULT_RETRY_AFTER,
        }
    }
}

impl LedgerConfig {
    pub fn validate(self) -> Result<Self> {
        if self.min_balance > self.max_balance {
            return Err(LedgerError::ConfigError(format!(
                "min balance {} exceeds max balance {}",
                self.min_balance, self.max_balance
            )));
        }
        if self.workers == 0 {
            return Err(LedgerError::ConfigError(
                "worker pool size must be positive".to_string(),
            ));
        }
        if self.lock_wait.is_zero() {
            return Err(LedgerError::ConfigError(
                "lock wait must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}
