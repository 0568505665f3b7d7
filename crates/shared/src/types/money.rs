//! Monetary helpers: currency-code validation, rounding, tolerances.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; comparisons against the balance
//! tolerance use decimal arithmetic, never float epsilons.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance for balance comparisons: 0.01 in the minor currency unit.
///
/// Debits and credits that differ by no more than this are considered equal.
#[must_use]
pub fn balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Returns true if `code` has the shape of an ISO 4217 currency code:
/// exactly 3 ASCII uppercase letters.
#[must_use]
pub fn is_valid_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Rounds an amount to 2 minor-unit digits using Banker's Rounding
/// (round half to even), minimizing cumulative error across many lines.
#[must_use]
pub fn round_minor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Rounds an exchange rate to 4 fraction digits using Banker's Rounding.
#[must_use]
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if `a` and `b` are equal within the balance tolerance.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= balance_tolerance()
}
