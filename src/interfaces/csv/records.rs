use crate::commands::{ApplicationError, CommandKind, CommandResult, Response};
use crate::domain::account::{Account, Uid};
use crate::domain::money::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Validation,
    Rejected,
    Retry,
    Error,
}

/// One output row per processed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub seq: u64,
    pub command: CommandKind,
    pub status: OutcomeStatus,
    pub code: Option<String>,
    pub detail: String,
}

impl OutcomeRecord {
    pub fn new(seq: u64, command: CommandKind, result: &CommandResult<Response>) -> Self {
        let (status, code, detail) = match result {
            CommandResult::Success(response) => {
                let detail = match response {
                    Response::AccountCreated(created) => created.account.to_string(),
                    Response::Balance(balance) => balance.balance.to_string(),
                    Response::Transferred(_) => "Success".to_string(),
                };
                (OutcomeStatus::Success, None, detail)
            }
            CommandResult::Validation(error) => (
                OutcomeStatus::Validation,
                Some(error.code()),
                error.message.clone(),
            ),
            CommandResult::Application(error) => {
                let status = match error {
                    ApplicationError::TechnicalError => OutcomeStatus::Error,
                    _ => OutcomeStatus::Rejected,
                };
                (status, Some(error.code().to_string()), error.message().to_string())
            }
            CommandResult::RetryAfter(delay) => (
                OutcomeStatus::Retry,
                Some("AccountBusy".to_string()),
                delay.as_millis().to_string(),
            ),
        };
        Self {
            seq,
            command,
            status,
            code,
            detail,
        }
    }
}

/// One row of the final accounts table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRecord {
    pub account: Uid,
    pub balance: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            account: account.uid(),
            balance: account.balance().amount(),
            currency: account.balance().currency(),
            created_at: account.created_at(),
        }
    }
}
