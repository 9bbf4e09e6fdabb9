use super::{ApplicationError, CommandResult, MoneyDto, ValidationError, parse_money};
use crate::application::ledger::Ledger;
use crate::domain::account::Uid;
use crate::domain::money::Money;
use crate::error::CreateAccountError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateAccountRequest {
    pub balance: Option<MoneyDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAccountResponse {
    pub account: Uid,
}

pub fn validate(request: &CreateAccountRequest) -> Result<Money, ValidationError> {
    let (amount, currency) = parse_money(request.balance.as_ref(), "balance", "Balance")?;
    if amount < Decimal::ZERO {
        return Err(ValidationError::invalid(
            "balance",
            "Balance must be non-negative",
        ));
    }
    Money::new(amount, currency).map_err(|_| {
        ValidationError::invalid(
            "balance",
            format!(
                "Balance sum must have {} decimal places",
                currency.minor_units()
            ),
        )
    })
}

pub async fn execute(
    ledger: &Ledger,
    request: CreateAccountRequest,
) -> CommandResult<CreateAccountResponse> {
    let balance = match validate(&request) {
        Ok(balance) => balance,
        Err(error) => return CommandResult::Validation(error),
    };
    match ledger.create_account(balance).await {
        Ok(account) => CommandResult::Success(CreateAccountResponse {
            account: account.uid(),
        }),
        Err(CreateAccountError::BalanceTooHigh) => {
            CommandResult::Application(ApplicationError::BalanceTooHigh)
        }
    }
}
