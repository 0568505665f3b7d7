//! Advance/prepayment sub-ledger.
//!
//! Tracks per-party, per-currency advance balances created by overpayment
//! and consumed by future settlements. The balance is the one mutable
//! running total in the system; its persistence must be committed in the
//! same transaction as the journal that moved it.

pub mod error;
pub mod ledger;

pub use error::AdvanceError;
pub use ledger::{AdvanceBalance, AdvanceKey, AdvanceLedger, Party, PartyType};
