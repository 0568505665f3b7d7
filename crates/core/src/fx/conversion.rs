//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round to the currency's minor unit (2 digits)
//! - Use banker's rounding (round half to even)
//! - Apply one rate uniformly to every line of a document

use rust_decimal::Decimal;

use saldo_shared::types::round_minor;

/// Converts an amount into the base currency using the given exchange rate.
///
/// `amount_in_transaction_currency * rate = amount_in_base_currency`,
/// rounded to 2 minor-unit digits with banker's rounding.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal) -> Decimal {
    round_minor(amount * rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_amount() {
        // 100.00 USD * 4.20 = 420.00 MYR
        assert_eq!(convert_amount(dec!(100.00), dec!(4.20)), dec!(420.00));
    }

    #[test]
    fn test_convert_identity_rate() {
        assert_eq!(convert_amount(dec!(150.55), Decimal::ONE), dec!(150.55));
    }

    #[test]
    fn test_convert_rounds_to_minor_unit() {
        // 33.33 * 1.3333 = 44.439889 -> 44.44
        assert_eq!(convert_amount(dec!(33.33), dec!(1.3333)), dec!(44.44));
    }

    #[test]
    fn test_bankers_rounding_midpoint() {
        // 2.5 at minor-unit midpoint: 1.25 * 0.1 = 0.125 -> 0.12 (even)
        assert_eq!(convert_amount(dec!(1.25), dec!(0.1)), dec!(0.12));
        // 0.135 -> 0.14 (even)
        assert_eq!(convert_amount(dec!(1.35), dec!(0.1)), dec!(0.14));
    }
}
