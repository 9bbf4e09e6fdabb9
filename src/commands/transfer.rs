use super::{ApplicationError, CommandResult, MoneyDto, ValidationError, parse_money};
use crate::application::ledger::Ledger;
use crate::domain::account::Uid;
use crate::domain::money::Money;
use crate::error::TransferError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransferRequest {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub amount: Option<MoneyDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferStatus {
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResponse {
    pub status: TransferStatus,
}

/// A transfer request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidTransfer {
    pub source: Uid,
    pub destination: Uid,
    pub amount: Money,
}

fn parse_uid(value: Option<&str>, param: &'static str) -> Result<Uid, ValidationError> {
    value
        .ok_or_else(|| ValidationError::not_provided(param))?
        .parse::<Uid>()
        .map_err(|_| ValidationError::invalid(param, format!("Parameter '{param}' is invalid")))
}

pub fn validate(request: &TransferRequest) -> Result<ValidTransfer, ValidationError> {
    let source = parse_uid(request.source.as_deref(), "source")?;
    let destination = parse_uid(request.destination.as_deref(), "destination")?;
    let (amount, currency) = parse_money(request.amount.as_ref(), "amount", "Amount")?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::invalid(
            "amount",
            "Amount to transfer must be positive",
        ));
    }
    let amount = Money::new(amount, currency).map_err(|_| {
        ValidationError::invalid(
            "amount",
            format!(
                "Amount to transfer must have {} decimal places",
                currency.minor_units()
            ),
        )
    })?;
    if source == destination {
        return Err(ValidationError::invalid(
            "destination",
            "Destination account must differ from source",
        ));
    }
    Ok(ValidTransfer {
        source,
        destination,
        amount,
    })
}

pub async fn execute(ledger: &Ledger, request: TransferRequest) -> CommandResult<TransferResponse> {
    let transfer = match validate(&request) {
        Ok(transfer) => transfer,
        Err(error) => return CommandResult::Validation(error),
    };
    match ledger
        .transfer(transfer.source, transfer.destination, transfer.amount)
        .await
    {
        Ok(_) => CommandResult::Success(TransferResponse {
            status: TransferStatus::Success,
        }),
        Err(error) => {
            warn!(%error, "failed to transfer money");
            map_error(error)
        }
    }
}

fn map_error(error: TransferError) -> CommandResult<TransferResponse> {
    let error = match error {
        TransferError::AccountBusy { retry_after } => return CommandResult::RetryAfter(retry_after),
        TransferError::AccountsCurrenciesNotSame => ApplicationError::AccountsCurrenciesNotSame,
        TransferError::AmountCurrencyMismatch => {
            ApplicationError::TransferAmountCurrencyDiffersFromAccounts
        }
        TransferError::InsufficientSourceBalance => ApplicationError::InsufficientSourceBalance,
        TransferError::DestinationBalanceOverflow => {
            ApplicationError::DestinationBalanceLimitExceeded
        }
        TransferError::AccountNotFound(_) => ApplicationError::AccountNotFound,
    };
    CommandResult::Application(error)
}
