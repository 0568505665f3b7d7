//! FX error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from FX policy resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// The transaction currency differs from base and no rate was supplied.
    #[error("Exchange rate required for {transaction} to {base}")]
    ExchangeRateRequired {
        /// Transaction currency code.
        transaction: String,
        /// Base (functional) currency code.
        base: String,
    },

    /// A rate was supplied but is zero or negative.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidExchangeRate(Decimal),
}

impl FxError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ExchangeRateRequired { .. } => "EXCHANGE_RATE_REQUIRED",
            Self::InvalidExchangeRate(_) => "INVALID_EXCHANGE_RATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        let required = FxError::ExchangeRateRequired {
            transaction: "USD".to_string(),
            base: "MYR".to_string(),
        };
        assert_eq!(required.error_code(), "EXCHANGE_RATE_REQUIRED");
        assert_eq!(
            FxError::InvalidExchangeRate(dec!(0)).error_code(),
            "INVALID_EXCHANGE_RATE"
        );
    }

    #[test]
    fn test_error_display() {
        let err = FxError::ExchangeRateRequired {
            transaction: "USD".to_string(),
            base: "MYR".to_string(),
        };
        assert_eq!(err.to_string(), "Exchange rate required for USD to MYR");
    }
}
