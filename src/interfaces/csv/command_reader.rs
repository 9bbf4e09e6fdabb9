use crate::commands::balance::BalanceRequest;
use crate::commands::create::CreateAccountRequest;
use crate::commands::transfer::TransferRequest;
use crate::commands::{CommandKind, MoneyDto, Request};
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::io::Read;

/// One input row. Which columns matter depends on `command`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandRecord {
    pub command: CommandKind,
    pub account: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
}

impl CommandRecord {
    fn money(&self) -> Option<MoneyDto> {
        if self.amount.is_none() && self.currency.is_none() {
            return None;
        }
        Some(MoneyDto {
            amount: self.amount.clone(),
            currency: self.currency.clone(),
        })
    }
}

impl From<CommandRecord> for Request {
    fn from(record: CommandRecord) -> Self {
        match record.command {
            CommandKind::Create => Request::CreateAccount(CreateAccountRequest {
                balance: record.money(),
            }),
            CommandKind::Balance => Request::Balance(BalanceRequest {
                account: record.account,
            }),
            CommandKind::Transfer => {
                let amount = record.money();
                Request::Transfer(TransferRequest {
                    source: record.source,
                    destination: record.destination,
                    amount,
                })
            }
        }
    }
}

/// Reads ledger commands from a CSV source.
///
/// Expects the header `command, account, source, destination, amount, currency`.
/// Whitespace is trimmed and short rows are accepted; missing columns read as empty.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes records, so large inputs are streamed.
    pub fn records(self) -> impl Iterator<Item = Result<CommandRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
