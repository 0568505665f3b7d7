//! Journal posting validation.
//!
//! This module implements the double-entry posting gate:
//! - Journal and line domain types
//! - Posting context (tenant, company, acting user, role)
//! - Balance and authorization invariants
//! - Error types naming the failed rule
//!
//! Validation is a pure function: it consults the injected account lookup
//! and segregation-of-duties oracle, performs no persistence, and either
//! accepts the whole posting or rejects it - there is no partial acceptance
//! of a subset of lines.

pub mod error;
pub mod types;
pub mod validator;

#[cfg(test)]
mod validator_props;

pub use error::PostingError;
pub use types::{
    Journal, JournalLine, PostingContext, UserRole, ValidatedPosting, VoucherType,
};
pub use validator::PostingValidator;
