//! FX policy resolution.

use rust_decimal::Decimal;

use super::error::FxError;

/// Outcome of FX policy resolution for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRequirement {
    /// Transaction currency equals the base currency; no conversion.
    NotRequired,
    /// Conversion required at the validated rate.
    Required {
        /// The validated positive exchange rate (transaction to base).
        rate: Decimal,
    },
}

impl ConversionRequirement {
    /// Returns true if conversion is required.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required { .. })
    }

    /// Returns the effective rate: the validated rate, or 1 when no
    /// conversion is required.
    #[must_use]
    pub const fn effective_rate(&self) -> Decimal {
        match self {
            Self::NotRequired => Decimal::ONE,
            Self::Required { rate } => *rate,
        }
    }
}

/// Stateless FX policy resolver.
pub struct FxPolicy;

impl FxPolicy {
    /// Decides whether `transaction_currency` requires conversion against
    /// `base_currency` and validates the supplied rate.
    ///
    /// Same currency resolves to `NotRequired` regardless of any supplied
    /// rate. A differing currency requires a positive rate: a missing rate
    /// is `ExchangeRateRequired`, a zero or negative rate is
    /// `InvalidExchangeRate` - two distinct failures.
    ///
    /// # Errors
    ///
    /// Returns `FxError` if a required rate is missing or not positive.
    pub fn resolve(
        base_currency: &str,
        transaction_currency: &str,
        rate: Option<Decimal>,
    ) -> Result<ConversionRequirement, FxError> {
        if transaction_currency == base_currency {
            return Ok(ConversionRequirement::NotRequired);
        }

        match rate {
            None => Err(FxError::ExchangeRateRequired {
                transaction: transaction_currency.to_string(),
                base: base_currency.to_string(),
            }),
            Some(rate) if rate <= Decimal::ZERO => Err(FxError::InvalidExchangeRate(rate)),
            Some(rate) => Ok(ConversionRequirement::Required { rate }),
        }
    }
}
