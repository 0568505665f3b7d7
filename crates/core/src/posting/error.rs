//! Posting validation error types.
//!
//! Every rejection names the failing rule; any failed check aborts the
//! whole posting.

use rust_decimal::Decimal;
use thiserror::Error;

use saldo_shared::types::{AccountId, JournalLineId};

use super::types::{UserRole, VoucherType};

/// Errors that can occur during journal posting validation.
#[derive(Debug, Error)]
pub enum PostingError {
    /// Journal has no lines.
    #[error("Journal must have at least one line")]
    EmptyJournal,

    /// A line has both debit and credit set.
    #[error("Line {0} has both debit and credit amounts set")]
    BothSidesSet(JournalLineId),

    /// A line has neither debit nor credit set.
    #[error("Line {0} has neither a debit nor a credit amount")]
    NoSideSet(JournalLineId),

    /// A line amount is negative.
    #[error("Line {0} has a negative amount")]
    NegativeAmount(JournalLineId),

    /// Journal does not balance within tolerance.
    #[error("Journal is not balanced. Debits: {debits}, Credits: {credits}")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Referenced account belongs to a different tenant or company.
    #[error("Account {0} does not belong to the posting tenant/company")]
    AccountOwnershipMismatch(AccountId),

    /// The acting role is not authorized to post this voucher type.
    #[error("Role {role:?} is not authorized to post voucher type {voucher_type:?}")]
    NotAuthorized {
        /// The acting user's role.
        role: UserRole,
        /// The voucher type being posted.
        voucher_type: VoucherType,
    },
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyJournal => "EMPTY_JOURNAL",
            Self::BothSidesSet(_) => "BOTH_SIDES_SET",
            Self::NoSideSet(_) => "NO_SIDE_SET",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountOwnershipMismatch(_) => "ACCOUNT_OWNERSHIP_MISMATCH",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
        }
    }
}
