//! Chart of accounts domain types.
//!
//! This module defines the account tree nodes and the classification rules
//! used by the posting validator, the settlement processor, and the report
//! generator:
//! - Account types with their normal balance side
//! - Subtypes driving statement sections and cash-flow classification
//! - Parent/child type compatibility

pub mod types;

pub use types::{
    Account, AccountHierarchyError, AccountSubtype, AccountType, CashFlowActivity, NormalBalance,
};
