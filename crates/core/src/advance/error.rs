//! Advance ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use super::ledger::PartyType;

/// Errors that can occur during advance ledger operations.
#[derive(Debug, Error)]
pub enum AdvanceError {
    /// Credit/debit amounts must be positive.
    #[error("Advance amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// No advance account is configured/resolvable for the party type and
    /// currency.
    #[error("No advance account resolvable for {party_type:?} in {currency}")]
    AccountUnresolved {
        /// Customer or supplier.
        party_type: PartyType,
        /// Currency of the advance.
        currency: String,
    },

    /// No advance balance exists for the key.
    #[error("No advance balance exists for the requested party and currency")]
    NotFound,

    /// Consuming more than the available advance is a validation error,
    /// never a silent clamp.
    #[error("Insufficient advance: available {available}, requested {requested}")]
    InsufficientAdvance {
        /// The balance currently available.
        available: Decimal,
        /// The amount the settlement tried to consume.
        requested: Decimal,
    },
}

impl AdvanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_ADVANCE_AMOUNT",
            Self::AccountUnresolved { .. } => "ADVANCE_ACCOUNT_UNRESOLVED",
            Self::NotFound => "ADVANCE_NOT_FOUND",
            Self::InsufficientAdvance { .. } => "INSUFFICIENT_ADVANCE",
        }
    }
}
