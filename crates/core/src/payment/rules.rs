//! Business rule validation for payments.
//!
//! Pure, synchronous checks on the request itself. Every violated rule is
//! collected; the caller surfaces the full list.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use saldo_shared::types::is_valid_currency_code;

use super::error::RuleViolation;
use super::types::{DocumentKind, Payment};

/// Validates a payment request against the business rules and returns every
/// violation found.
///
/// Checks: posting date not in the future, currency code shape, positive
/// amount, at least one allocation, positive allocation/charge/withholding
/// amounts, bill allocations carry a supplier, invoice allocations carry a
/// customer, no mixing of bills and invoices, and
/// allocations + charges + withholding not exceeding the payment amount
/// beyond `tolerance` (a shortfall is allowed and becomes an advance).
#[must_use]
pub fn validate_business_rules(
    payment: &Payment,
    today: NaiveDate,
    tolerance: Decimal,
) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    if payment.posting_date > today {
        violations.push(RuleViolation::new(
            "POSTING_DATE_IN_FUTURE",
            format!("posting date {} is after {today}", payment.posting_date),
        ));
    }

    if !is_valid_currency_code(&payment.currency) {
        violations.push(RuleViolation::new(
            "INVALID_CURRENCY_CODE",
            format!("'{}' is not a 3-letter ISO 4217 code", payment.currency),
        ));
    }

    if payment.amount <= Decimal::ZERO {
        violations.push(RuleViolation::new(
            "NON_POSITIVE_AMOUNT",
            format!("payment amount must be positive, got {}", payment.amount),
        ));
    }

    if payment.allocations.is_empty() {
        violations.push(RuleViolation::new(
            "NO_ALLOCATIONS",
            "payment must allocate to at least one document",
        ));
    }

    for allocation in &payment.allocations {
        if allocation.amount <= Decimal::ZERO {
            violations.push(RuleViolation::new(
                "ALLOCATION_NOT_POSITIVE",
                format!(
                    "allocation against {} must be positive, got {}",
                    allocation.document_ref, allocation.amount
                ),
            ));
        }
        match allocation.document_kind {
            DocumentKind::Bill if allocation.supplier_id.is_none() => {
                violations.push(RuleViolation::new(
                    "BILL_ALLOCATION_MISSING_SUPPLIER",
                    format!("bill allocation {} has no supplier", allocation.document_ref),
                ));
            }
            DocumentKind::Invoice if allocation.customer_id.is_none() => {
                violations.push(RuleViolation::new(
                    "INVOICE_ALLOCATION_MISSING_CUSTOMER",
                    format!(
                        "invoice allocation {} has no customer",
                        allocation.document_ref
                    ),
                ));
            }
            _ => {}
        }
    }

    if !payment.allocations.is_empty() && payment.direction().is_none() {
        violations.push(RuleViolation::new(
            "MIXED_ALLOCATION_TYPES",
            "a payment settles either bills or invoices, not both",
        ));
    }

    for charge in &payment.bank_charges {
        if charge.amount <= Decimal::ZERO {
            violations.push(RuleViolation::new(
                "CHARGE_NOT_POSITIVE",
                format!("bank charge must be positive, got {}", charge.amount),
            ));
        }
    }

    for withholding in &payment.withholding {
        if withholding.amount <= Decimal::ZERO {
            violations.push(RuleViolation::new(
                "WITHHOLDING_NOT_POSITIVE",
                format!("withholding must be positive, got {}", withholding.amount),
            ));
        }
    }

    // A shortfall becomes an advance; an excess is a hard error.
    if payment.remainder() < -tolerance {
        violations.push(RuleViolation::new(
            "OVER_ALLOCATED",
            format!(
                "allocations + charges + withholding ({}) exceed payment amount ({})",
                payment.total_allocated() + payment.total_charges() + payment.total_withholding(),
                payment.amount
            ),
        ));
    }

    violations
}
