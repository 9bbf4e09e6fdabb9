use super::money::Money;
use crate::error::InvalidUid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Account identifier.
///
/// Always positive. Rendered as a decimal string outside the ledger and
/// ordered numerically, which is the order locks are taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(u64);

impl Uid {
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    // Only the registry's generator mints identifiers, and it never yields zero.
    pub(crate) fn minted(value: u64) -> Self {
        debug_assert!(value > 0);
        Self(value)
    }
}

impl FromStr for Uid {
    type Err = InvalidUid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `u64::from_str` accepts a leading '+', which is not a valid identifier.
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidUid(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(Uid::new)
            .ok_or_else(|| InvalidUid(s.to_string()))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Uid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Immutable snapshot of an account.
///
/// A balance change never mutates an `Account`: it builds a new value with
/// [`Account::with_balance`] and stores it under the same uid, so a snapshot
/// someone already holds stays consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    uid: Uid,
    balance: Money,
    created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(uid: Uid, balance: Money, created_at: DateTime<Utc>) -> Self {
        Self {
            uid,
            balance,
            created_at,
        }
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this account with the balance replaced.
    pub fn with_balance(&self, balance: Money) -> Self {
        Self {
            balance,
            ..self.clone()
        }
    }
}
