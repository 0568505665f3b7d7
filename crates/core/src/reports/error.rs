//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use saldo_shared::types::AccountId;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// A posted line references an account missing from the chart.
    #[error("Posted line references unknown account {0}")]
    UnknownAccount(AccountId),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
        }
    }
}
