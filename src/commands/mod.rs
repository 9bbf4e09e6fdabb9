//! Request handling in front of the ledger core.
//!
//! Each command validates a loosely typed request until the first error,
//! calls the core, and folds the outcome into a [`CommandResult`]. Nothing
//! here knows about the transport the requests arrived on.

pub mod balance;
pub mod create;
pub mod executor;
pub mod transfer;

use crate::application::ledger::Ledger;
use crate::domain::money::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use balance::{BalanceRequest, BalanceResponse};
use create::{CreateAccountRequest, CreateAccountResponse};
use transfer::{TransferRequest, TransferResponse};

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult<T> {
    Success(T),
    /// The request was malformed. Reported before the core is called.
    Validation(ValidationError),
    /// The core rejected the request. Terminal.
    Application(ApplicationError),
    /// The accounts were busy. The same request may succeed after the delay.
    RetryAfter(Duration),
}

impl<T> CommandResult<T> {
    pub fn map<U, F>(self, f: F) -> CommandResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            CommandResult::Success(value) => CommandResult::Success(f(value)),
            CommandResult::Validation(error) => CommandResult::Validation(error),
            CommandResult::Application(error) => CommandResult::Application(error),
            CommandResult::RetryAfter(delay) => CommandResult::RetryAfter(delay),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }
}

/// Rejections reported with a stable machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationError {
    BalanceTooHigh,
    AccountNotFound,
    AccountsCurrenciesNotSame,
    TransferAmountCurrencyDiffersFromAccounts,
    InsufficientSourceBalance,
    DestinationBalanceLimitExceeded,
    /// An unexpected internal failure. Carries no details on purpose.
    TechnicalError,
}

impl ApplicationError {
    pub fn code(&self) -> &'static str {
        match self {
            ApplicationError::BalanceTooHigh => "BalanceTooHigh",
            ApplicationError::AccountNotFound => "AccountNotFound",
            ApplicationError::AccountsCurrenciesNotSame => "AccountsCurrenciesNotSame",
            ApplicationError::TransferAmountCurrencyDiffersFromAccounts => {
                "TransferAmountCurrencyDiffersFromAccounts"
            }
            ApplicationError::InsufficientSourceBalance => "InsufficientSourceBalance",
            ApplicationError::DestinationBalanceLimitExceeded => "DestinationBalanceLimitExceeded",
            ApplicationError::TechnicalError => "TechnicalError",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApplicationError::BalanceTooHigh => "Balance is too high",
            ApplicationError::AccountNotFound => "Account was not found",
            ApplicationError::AccountsCurrenciesNotSame => {
                "Currencies of given accounts differs from each other"
            }
            ApplicationError::TransferAmountCurrencyDiffersFromAccounts => {
                "Currency of amount to transfer differs from requested accounts"
            }
            ApplicationError::InsufficientSourceBalance => "Insufficient balance on source account",
            ApplicationError::DestinationBalanceLimitExceeded => {
                "Destination balance limit will be exceeded"
            }
            ApplicationError::TechnicalError => "Technical error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    NotProvided,
    Invalid,
}

/// A single malformed request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub param: &'static str,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn not_provided(param: &'static str) -> Self {
        Self {
            param,
            code: ValidationCode::NotProvided,
            message: format!("Parameter '{param}' must be provided"),
        }
    }

    pub fn invalid(param: &'static str, message: impl Into<String>) -> Self {
        Self {
            param,
            code: ValidationCode::Invalid,
            message: message.into(),
        }
    }

    /// Code such as `amountInvalid` or `sourceNotProvided`.
    pub fn code(&self) -> String {
        match self.code {
            ValidationCode::NotProvided => format!("{}NotProvided", self.param),
            ValidationCode::Invalid => format!("{}Invalid", self.param),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)
    }
}

/// A monetary amount as it arrives in a request: both parts optional and unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MoneyDto {
    pub amount: Option<String>,
    pub currency: Option<String>,
}

impl MoneyDto {
    pub fn new(amount: &str, currency: &str) -> Self {
        Self {
            amount: Some(amount.to_string()),
            currency: Some(currency.to_string()),
        }
    }
}

/// Checks shared by every money parameter: currency present and supported,
/// amount present and a decimal number. `label` prefixes the messages.
fn parse_money(
    dto: Option<&MoneyDto>,
    param: &'static str,
    label: &str,
) -> Result<(Decimal, Currency), ValidationError> {
    let dto = dto.ok_or_else(|| ValidationError::not_provided(param))?;
    let invalid = |message: String| ValidationError::invalid(param, message);
    let currency = dto
        .currency
        .as_deref()
        .ok_or_else(|| invalid(format!("{label} currency must be provided")))?
        .parse::<Currency>()
        .map_err(|_| invalid(format!("{label} currency is not supported")))?;
    let amount = dto
        .amount
        .as_deref()
        .ok_or_else(|| invalid(format!("{label} sum must be provided")))?
        .parse::<Decimal>()
        .map_err(|_| invalid(format!("{label} sum must be a decimal number")))?;
    Ok((amount, currency))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Create,
    Balance,
    Transfer,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandKind::Create => "create",
            CommandKind::Balance => "balance",
            CommandKind::Transfer => "transfer",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateAccount(CreateAccountRequest),
    Balance(BalanceRequest),
    Transfer(TransferRequest),
}

impl Request {
    pub fn kind(&self) -> CommandKind {
        match self {
            Request::CreateAccount(_) => CommandKind::Create,
            Request::Balance(_) => CommandKind::Balance,
            Request::Transfer(_) => CommandKind::Transfer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    AccountCreated(CreateAccountResponse),
    Balance(BalanceResponse),
    Transferred(TransferResponse),
}

/// Validates and runs one request against the ledger.
pub async fn execute(ledger: &Ledger, request: Request) -> CommandResult<Response> {
    match request {
        Request::CreateAccount(request) => create::execute(ledger, request)
            .await
            .map(Response::AccountCreated),
        Request::Balance(request) => balance::execute(ledger, request)
            .await
            .map(Response::Balance),
        Request::Transfer(request) => transfer::execute(ledger, request)
            .await
            .map(Response::Transferred),
    }
}
