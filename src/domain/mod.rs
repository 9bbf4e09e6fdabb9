//! Domain types: identifiers, money, account snapshots and the storage port.

pub mod account;
pub mod money;
pub mod ports;
