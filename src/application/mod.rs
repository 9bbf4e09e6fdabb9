//! Application layer: the concurrent transfer engine.
//!
//! [`registry::AccountRegistry`] owns accounts and their bounds,
//! [`locks::LockTable`] hands out per-account locks with a bounded wait,
//! [`locker::OrderedLocker`] takes two of them deadlock-free and
//! [`transfer::TransferService`] combines all three. [`ledger::Ledger`]
//! wires them from a [`crate::config::LedgerConfig`].

pub mod ledger;
pub mod locker;
pub mod locks;
pub mod registry;
pub mod transfer;
