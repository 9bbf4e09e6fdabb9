use super::{ApplicationError, CommandResult, ValidationError};
use crate::application::ledger::Ledger;
use crate::domain::account::Uid;
use crate::domain::money::Money;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BalanceRequest {
    pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResponse {
    pub balance: Money,
}

pub fn validate(request: &BalanceRequest) -> Result<Uid, ValidationError> {
    request
        .account
        .as_deref()
        .and_then(|uid| uid.parse::<Uid>().ok())
        .ok_or_else(|| ValidationError::invalid("uid", "Parameter 'uid' is invalid"))
}

pub async fn execute(ledger: &Ledger, request: BalanceRequest) -> CommandResult<BalanceResponse> {
    let uid = match validate(&request) {
        Ok(uid) => uid,
        Err(error) => return CommandResult::Validation(error),
    };
    match ledger.balance(uid).await {
        Ok(balance) => CommandResult::Success(BalanceResponse { balance }),
        Err(error) => {
            warn!(%error, "balance requested for unknown account");
            CommandResult::Application(ApplicationError::AccountNotFound)
        }
    }
}
