#![allow(dead_code)]

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use txledger::application::ledger::Ledger;
use txledger::application::transfer::Transfer;
use txledger::domain::account::{Account, Uid};
use txledger::domain::money::{Currency, Money};
use txledger::domain::ports::AccountStore;
use txledger::error::TransferError;
use txledger::infrastructure::in_memory::InMemoryAccountStore;

pub fn usd(amount: &str) -> Money {
    Money::new(Decimal::from_str(amount).unwrap(), Currency::Usd).unwrap()
}

/// Creates `count` USD accounts holding `balance` each.
pub async fn open_accounts(ledger: &Ledger, count: usize, balance: &str) -> Vec<Uid> {
    let mut uids = Vec::with_capacity(count);
    for _ in 0..count {
        uids.push(ledger.create_account(usd(balance)).await.unwrap().uid());
    }
    uids
}

pub async fn total(ledger: &Ledger) -> Decimal {
    ledger
        .accounts()
        .await
        .iter()
        .map(|account| account.balance().amount())
        .sum()
}

/// Repeats a transfer until it is no longer reported busy.
pub async fn transfer_with_retry(
    ledger: &Ledger,
    source: Uid,
    destination: Uid,
    amount: Money,
) -> Result<Transfer, TransferError> {
    loop {
        match ledger.transfer(source, destination, amount).await {
            Err(TransferError::AccountBusy { retry_after }) => {
                tokio::time::sleep(retry_after).await
            }
            other => return other,
        }
    }
}

/// An in-memory store whose reads are slow, so a task holding an account
/// lock stays inside it long enough for others to pile up behind it.
pub struct SlowStore {
    inner: InMemoryAccountStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryAccountStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl AccountStore for SlowStore {
    async fn put(&self, account: Account) {
        self.inner.put(account).await
    }

    async fn get(&self, uid: Uid) -> Option<Account> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(uid).await
    }

    async fn all(&self) -> Vec<Account> {
        self.inner.all().await
    }
}

/// Writes a command file that opens `accounts` accounts and then moves
/// money between random pairs of them.
pub fn generate_commands(
    path: &Path,
    accounts: usize,
    balance: &str,
    transfers: usize,
) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["command", "account", "source", "destination", "amount", "currency"])?;

    for _ in 0..accounts {
        wtr.write_record(["create", "", "", "", balance, "USD"])?;
    }

    let mut rng = rand::thread_rng();
    let first = 1_000_000_001u64;
    for _ in 0..transfers {
        let source = first + rng.gen_range(0..accounts as u64);
        let destination = loop {
            let candidate = first + rng.gen_range(0..accounts as u64);
            if candidate != source {
                break candidate;
            }
        };
        let cents: u32 = rng.gen_range(1..=1000);
        let amount = Decimal::new(cents as i64, 2).to_string();
        wtr.write_record([
            "transfer",
            "",
            &source.to_string(),
            &destination.to_string(),
            &amount,
            "USD",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
