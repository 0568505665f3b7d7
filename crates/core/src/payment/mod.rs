//! Payment / settlement processing.
//!
//! Turns a payment with allocations, bank charges, withholding tax and
//! optional foreign currency into a balanced journal ready for the posting
//! validator, handling overpayment via the advance sub-ledger. Either a
//! fully balanced journal is produced and validated, or nothing is posted.

pub mod error;
pub mod processor;
pub mod rules;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{PaymentError, RuleViolation};
pub use processor::SettlementProcessor;
pub use types::{
    AdvanceUpdate, BankCharge, DocumentKind, Payment, PaymentAllocation, PaymentDirection,
    PaymentMethod, SettlementOutcome, WithholdingTax,
};
