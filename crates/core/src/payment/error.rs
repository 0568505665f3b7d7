//! Payment processing error types.
//!
//! Error conditions are typed, not generic. Business-rule failures carry
//! the full list of violated rules, not just the first.

use thiserror::Error;

use saldo_shared::types::BankAccountId;

use crate::advance::AdvanceError;
use crate::fx::FxError;
use crate::posting::PostingError;

/// One violated business rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// Machine-readable rule code.
    pub code: &'static str,
    /// Human-readable detail.
    pub message: String,
}

impl RuleViolation {
    /// Creates a violation.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Errors that can occur during payment settlement.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// FX policy failure (missing or invalid exchange rate).
    #[error(transparent)]
    Fx(#[from] FxError),

    /// A party or bank account currency does not match the payment currency.
    #[error("{entity} currency {actual} does not match payment currency {expected}")]
    CurrencyMismatch {
        /// What carried the mismatching currency (customer/supplier/bank account).
        entity: &'static str,
        /// The payment currency.
        expected: String,
        /// The stored currency found.
        actual: String,
    },

    /// The settlement bank account does not exist.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(BankAccountId),

    /// The named customer does not exist.
    #[error("Customer not found")]
    CustomerNotFound,

    /// The named supplier does not exist.
    #[error("Supplier not found")]
    SupplierNotFound,

    /// A configured account code could not be resolved in the chart of
    /// accounts.
    #[error("Configured account code {0} not found in chart of accounts")]
    ConfiguredAccountNotFound(String),

    /// Business rule validation failed; carries every violated rule.
    #[error("Payment validation failed: {n} rule(s) violated", n = .0.len())]
    ValidationFailed(Vec<RuleViolation>),

    /// Advance ledger rejected the settlement's sub-ledger movement.
    #[error(transparent)]
    Advance(#[from] AdvanceError),

    /// The constructed journal failed posting validation.
    #[error("Journal validation failed: {0}")]
    JournalRejected(#[from] PostingError),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Fx(inner) => inner.error_code(),
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::CustomerNotFound => "CUSTOMER_NOT_FOUND",
            Self::SupplierNotFound => "SUPPLIER_NOT_FOUND",
            Self::ConfiguredAccountNotFound(_) => "CONFIGURED_ACCOUNT_NOT_FOUND",
            Self::ValidationFailed(_) => "PAYMENT_VALIDATION_FAILED",
            Self::Advance(inner) => inner.error_code(),
            Self::JournalRejected(_) => "JOURNAL_VALIDATION_FAILED",
        }
    }
}
