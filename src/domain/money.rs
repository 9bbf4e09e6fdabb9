use crate::error::MoneyError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported account currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// United States dollar
    Usd,
    /// Euro
    Eur,
    /// Russian ruble
    Rub,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Rub];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Rub => "RUB",
        }
    }

    /// Number of fractional digits every amount in this currency carries.
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::Usd | Currency::Eur | Currency::Rub => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| MoneyError::UnsupportedCurrency(code.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An exact decimal amount tagged with its currency.
///
/// The amount always has exactly `currency.minor_units()` fractional digits,
/// so `100.00 USD` is valid and `100 USD` or `100.001 USD` are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if amount.scale() != currency.minor_units() {
            return Err(MoneyError::Precision {
                currency,
                expected: currency.minor_units(),
            });
        }
        Ok(Self { amount, currency })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Adds `delta` in the same currency. `None` on decimal overflow.
    pub fn checked_add(&self, delta: Decimal) -> Option<Self> {
        self.amount
            .checked_add(delta)
            .map(|amount| self.rescaled(amount))
    }

    /// Subtracts `delta` in the same currency. `None` on decimal overflow.
    pub fn checked_sub(&self, delta: Decimal) -> Option<Self> {
        self.amount
            .checked_sub(delta)
            .map(|amount| self.rescaled(amount))
    }

    // Keeps the fractional digit count stable after arithmetic.
    fn rescaled(&self, mut amount: Decimal) -> Self {
        amount.rescale(self.currency.minor_units());
        Self {
            amount,
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
