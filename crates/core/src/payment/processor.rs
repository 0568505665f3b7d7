//! Settlement processing: from payment request to balanced journal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use saldo_shared::config::CoreConfig;
use saldo_shared::types::JournalId;

use super::error::{PaymentError, RuleViolation};
use super::rules::validate_business_rules;
use super::types::{
    AdvanceUpdate, DocumentKind, Payment, PaymentDirection, SettlementOutcome,
};
use crate::account::AccountSubtype;
use crate::advance::{AdvanceKey, AdvanceLedger, Party, PartyType};
use crate::audit::{AuditEvent, AuditSink};
use crate::fx::{convert_amount, FxPolicy};
use crate::posting::{
    Journal, JournalLine, PostingContext, PostingValidator, VoucherType,
};
use crate::repository::LedgerRepository;

/// Stateless payment settlement processor.
pub struct SettlementProcessor;

impl SettlementProcessor {
    /// Settles a payment: validates FX and business rules, builds the
    /// balanced line set, validates the journal under the deterministic
    /// number `PAY-<payment number>`, and applies the overpayment remainder
    /// to the advance sub-ledger.
    ///
    /// The returned journal and advance update form one commit unit: the
    /// surrounding service must persist them in a single transaction.
    /// Nothing is posted on any failure.
    ///
    /// `today` anchors the not-in-the-future posting date rule; callers
    /// pass the current business date.
    ///
    /// # Errors
    ///
    /// Returns a typed `PaymentError`; business-rule failures carry every
    /// violated rule.
    #[allow(clippy::too_many_arguments)]
    pub fn process<R, S>(
        payment: &Payment,
        ctx: &PostingContext,
        base_currency: &str,
        config: &CoreConfig,
        repository: &R,
        advance_ledger: &AdvanceLedger,
        sod_oracle: S,
        audit: &dyn AuditSink,
        today: NaiveDate,
    ) -> Result<SettlementOutcome, PaymentError>
    where
        R: LedgerRepository + ?Sized,
        S: Fn(&PostingContext, VoucherType) -> bool,
    {
        match Self::settle(
            payment,
            ctx,
            base_currency,
            config,
            repository,
            advance_ledger,
            sod_oracle,
            today,
        ) {
            Ok(outcome) => {
                info!(
                    payment_number = %payment.payment_number,
                    journal_number = %outcome.posting.journal.journal_number,
                    allocations = outcome.allocations_processed,
                    advance = outcome.advance_update.is_some(),
                    "payment settled"
                );
                audit.record(AuditEvent::PostingSucceeded {
                    tenant_id: payment.tenant_id,
                    company_id: payment.company_id,
                    journal_id: outcome.posting.journal.id,
                    journal_number: outcome.posting.journal.journal_number.clone(),
                    total: outcome.posting.total_debits,
                });
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    payment_number = %payment.payment_number,
                    code = err.error_code(),
                    "payment settlement rejected"
                );
                audit.record(AuditEvent::PostingFailed {
                    tenant_id: payment.tenant_id,
                    company_id: payment.company_id,
                    journal_number: Some(format!("PAY-{}", payment.payment_number)),
                    code: err.error_code().to_string(),
                    detail: Self::failure_detail(&err),
                });
                Err(err)
            }
        }
    }

    #[allow(clippy::too_many_arguments, clippy::too_many_lines)]
    fn settle<R, S>(
        payment: &Payment,
        ctx: &PostingContext,
        base_currency: &str,
        config: &CoreConfig,
        repository: &R,
        advance_ledger: &AdvanceLedger,
        sod_oracle: S,
        today: NaiveDate,
    ) -> Result<SettlementOutcome, PaymentError>
    where
        R: LedgerRepository + ?Sized,
        S: Fn(&PostingContext, VoucherType) -> bool,
    {
        // 1. FX requirements and conversion rate
        let conversion =
            FxPolicy::resolve(base_currency, &payment.currency, payment.exchange_rate)?;
        let rate = conversion.effective_rate();

        // 2. Currency consistency against stored master data
        let bank = repository
            .bank_account(payment.bank_account_id)
            .ok_or(PaymentError::BankAccountNotFound(payment.bank_account_id))?;
        Self::check_currency_consistency(payment, &bank.currency, base_currency, repository)?;

        // 3. Business rules, collected in full
        let mut violations =
            validate_business_rules(payment, today, config.tolerance.balance);
        Self::check_settlement_accounts(payment, repository, &mut violations);
        Self::check_advance_party(payment, config.tolerance.balance, &mut violations);
        if !violations.is_empty() {
            return Err(PaymentError::ValidationFailed(violations));
        }

        let direction = match payment.direction() {
            Some(direction) => direction,
            None => {
                return Err(PaymentError::ValidationFailed(vec![RuleViolation::new(
                    "NO_ALLOCATIONS",
                    "payment must allocate to at least one document",
                )]))
            }
        };

        // 4. Convert everything with the single document rate
        let converted_allocations: Vec<Decimal> = payment
            .allocations
            .iter()
            .map(|a| convert_amount(a.amount, rate))
            .collect();
        let converted_charges: Vec<Decimal> = payment
            .bank_charges
            .iter()
            .map(|c| convert_amount(c.amount, rate))
            .collect();
        let converted_withholding: Vec<Decimal> = payment
            .withholding
            .iter()
            .map(|w| convert_amount(w.amount, rate))
            .collect();

        let allocation_total: Decimal = converted_allocations.iter().copied().sum();
        let charge_total: Decimal = converted_charges.iter().copied().sum();
        let withholding_total: Decimal = converted_withholding.iter().copied().sum();
        let converted_total = convert_amount(payment.amount, rate);

        // The remainder line absorbs conversion rounding so the journal
        // balances exactly by construction.
        let remainder = payment.remainder();
        let has_advance = remainder > config.tolerance.balance;
        let converted_remainder =
            converted_total - allocation_total - charge_total - withholding_total;
        let bank_amount = if has_advance {
            allocation_total + charge_total + converted_remainder
        } else {
            allocation_total + charge_total
        };

        // 5. Resolve generated-line accounts from configuration
        let withholding_accounts = if payment.withholding.is_empty() {
            None
        } else {
            let clearing = Self::resolve_configured_account(
                payment,
                repository,
                &config.accounts.withholding_clearing_code,
            )?;
            let payable = Self::resolve_configured_account(
                payment,
                repository,
                &config.accounts.withholding_payable_code,
            )?;
            Some((clearing, payable))
        };

        let advance_target = if has_advance {
            let party = Self::advance_party(payment, direction);
            let party = match party {
                Some(party) => party,
                None => {
                    return Err(PaymentError::ValidationFailed(vec![RuleViolation::new(
                        "ADVANCE_REQUIRES_PARTY",
                        "an overpaid settlement needs a customer or supplier to hold the advance",
                    )]))
                }
            };
            let code = match party.party_type() {
                PartyType::Customer => &config.accounts.customer_advance_code,
                PartyType::Supplier => &config.accounts.supplier_advance_code,
            };
            let key = AdvanceKey {
                tenant_id: payment.tenant_id,
                company_id: payment.company_id,
                party,
                currency: payment.currency.clone(),
            };
            let account_id = advance_ledger.resolve_or_create(&key, |_| {
                repository
                    .account_by_code(payment.tenant_id, payment.company_id, code)
                    .map(|account| account.id)
            })?;
            Some((key, account_id))
        } else {
            None
        };

        // 6. Build the line set, grouped by allocation type
        let mut lines: Vec<JournalLine> = Vec::new();
        match direction {
            PaymentDirection::Incoming => {
                lines.push(JournalLine::debit(
                    bank.gl_account_id,
                    bank_amount,
                    format!("Receipt {}", payment.payment_number),
                ));
                for (allocation, amount) in
                    payment.allocations.iter().zip(&converted_allocations)
                {
                    lines.push(
                        JournalLine::credit(
                            allocation.settlement_account_id,
                            *amount,
                            format!("Settlement of {}", allocation.document_ref),
                        )
                        .with_reference(allocation.document_ref.clone()),
                    );
                }
            }
            PaymentDirection::Outgoing => {
                for (allocation, amount) in
                    payment.allocations.iter().zip(&converted_allocations)
                {
                    lines.push(
                        JournalLine::debit(
                            allocation.settlement_account_id,
                            *amount,
                            format!("Settlement of {}", allocation.document_ref),
                        )
                        .with_reference(allocation.document_ref.clone()),
                    );
                }
            }
        }

        for (charge, amount) in payment.bank_charges.iter().zip(&converted_charges) {
            let description = charge
                .description
                .clone()
                .unwrap_or_else(|| "Bank charges".to_string());
            let line = match direction {
                PaymentDirection::Incoming => {
                    JournalLine::credit(charge.account_id, *amount, description)
                }
                PaymentDirection::Outgoing => {
                    JournalLine::debit(charge.account_id, *amount, description)
                }
            };
            lines.push(line);
        }

        if let Some((clearing_account, payable_account)) = withholding_accounts {
            for (withholding, amount) in payment.withholding.iter().zip(&converted_withholding) {
                let mut clearing =
                    JournalLine::debit(clearing_account, *amount, "Withholding tax");
                let mut payable =
                    JournalLine::credit(payable_account, *amount, "Withholding tax payable");
                if let Some(certificate) = &withholding.certificate_ref {
                    clearing = clearing.with_reference(certificate.clone());
                    payable = payable.with_reference(certificate.clone());
                }
                lines.push(clearing);
                lines.push(payable);
            }
        }

        if let Some((_, advance_account)) = &advance_target {
            let line = match direction {
                PaymentDirection::Incoming => JournalLine::credit(
                    *advance_account,
                    converted_remainder,
                    "Customer advance",
                ),
                PaymentDirection::Outgoing => JournalLine::debit(
                    *advance_account,
                    converted_remainder,
                    "Supplier advance",
                ),
            };
            lines.push(line);
        }

        if direction == PaymentDirection::Outgoing {
            lines.push(JournalLine::credit(
                bank.gl_account_id,
                bank_amount,
                format!("Payment {}", payment.payment_number),
            ));
        }

        // 7. Validate the whole journal; no partial acceptance
        let journal = Journal {
            id: JournalId::new(),
            tenant_id: payment.tenant_id,
            company_id: payment.company_id,
            journal_number: format!("PAY-{}", payment.payment_number),
            posting_date: payment.posting_date,
            currency: base_currency.to_string(),
            voucher_type: VoucherType::Payment,
            description: payment
                .description
                .clone()
                .unwrap_or_else(|| format!("Payment {}", payment.payment_number)),
            lines,
        };
        debug!(
            journal_number = %journal.journal_number,
            lines = journal.lines.len(),
            "journal constructed"
        );
        let posting = PostingValidator::validate_with_tolerance(
            &journal,
            ctx,
            |id| repository.account(id),
            &sod_oracle,
            config.tolerance.balance,
        )?;

        // 8. Apply the advance movement only after the journal is accepted,
        // so a rejection never leaves a dangling sub-ledger update. The
        // caller commits journal + balance as one transaction.
        let advance_update = match advance_target {
            Some((key, account_id)) => {
                let new_balance = advance_ledger.credit(&key, remainder)?;
                Some(AdvanceUpdate {
                    key,
                    account_id,
                    amount: remainder,
                    new_balance,
                })
            }
            None => None,
        };

        Ok(SettlementOutcome {
            posting,
            advance_update,
            allocations_processed: payment.allocations.len(),
            converted_total,
        })
    }

    /// Stored party and bank currencies must be consistent with the payment
    /// currency. A base-currency bank account may settle a foreign payment
    /// (conversion through the base account).
    fn check_currency_consistency<R>(
        payment: &Payment,
        bank_currency: &str,
        base_currency: &str,
        repository: &R,
    ) -> Result<(), PaymentError>
    where
        R: LedgerRepository + ?Sized,
    {
        if let Some(customer_id) = payment.customer_id {
            let customer = repository
                .customer(customer_id)
                .ok_or(PaymentError::CustomerNotFound)?;
            if customer.currency != payment.currency {
                return Err(PaymentError::CurrencyMismatch {
                    entity: "customer",
                    expected: payment.currency.clone(),
                    actual: customer.currency,
                });
            }
        }
        if let Some(supplier_id) = payment.supplier_id {
            let supplier = repository
                .supplier(supplier_id)
                .ok_or(PaymentError::SupplierNotFound)?;
            if supplier.currency != payment.currency {
                return Err(PaymentError::CurrencyMismatch {
                    entity: "supplier",
                    expected: payment.currency.clone(),
                    actual: supplier.currency,
                });
            }
        }

        let fx_through_base = bank_currency == base_currency && payment.currency != base_currency;
        if bank_currency != payment.currency && !fx_through_base {
            return Err(PaymentError::CurrencyMismatch {
                entity: "bank account",
                expected: payment.currency.clone(),
                actual: bank_currency.to_string(),
            });
        }
        Ok(())
    }

    /// Bill allocations must settle an AP account, invoice allocations an
    /// AR account.
    fn check_settlement_accounts<R>(
        payment: &Payment,
        repository: &R,
        violations: &mut Vec<RuleViolation>,
    ) where
        R: LedgerRepository + ?Sized,
    {
        for allocation in &payment.allocations {
            let Some(account) = repository.account(allocation.settlement_account_id) else {
                violations.push(RuleViolation::new(
                    "SETTLEMENT_ACCOUNT_NOT_FOUND",
                    format!(
                        "settlement account for {} does not exist",
                        allocation.document_ref
                    ),
                ));
                continue;
            };
            match allocation.document_kind {
                DocumentKind::Bill
                    if account.subtype != Some(AccountSubtype::AccountsPayable) =>
                {
                    violations.push(RuleViolation::new(
                        "BILL_ALLOCATION_NOT_AP_ACCOUNT",
                        format!(
                            "bill allocation {} must settle an accounts payable account",
                            allocation.document_ref
                        ),
                    ));
                }
                DocumentKind::Invoice
                    if account.subtype != Some(AccountSubtype::AccountsReceivable) =>
                {
                    violations.push(RuleViolation::new(
                        "INVOICE_ALLOCATION_NOT_AR_ACCOUNT",
                        format!(
                            "invoice allocation {} must settle an accounts receivable account",
                            allocation.document_ref
                        ),
                    ));
                }
                _ => {}
            }
        }
    }

    /// An overpaid settlement needs a party to hold the advance.
    fn check_advance_party(
        payment: &Payment,
        tolerance: Decimal,
        violations: &mut Vec<RuleViolation>,
    ) {
        if payment.remainder() <= tolerance {
            return;
        }
        let Some(direction) = payment.direction() else {
            return; // mixed/empty sets already flagged
        };
        if Self::advance_party(payment, direction).is_none() {
            violations.push(RuleViolation::new(
                "ADVANCE_REQUIRES_PARTY",
                "an overpaid settlement needs a customer or supplier to hold the advance",
            ));
        }
    }

    /// The party whose advance balance absorbs the remainder: the header
    /// party when named, otherwise the first allocation's party.
    fn advance_party(payment: &Payment, direction: PaymentDirection) -> Option<Party> {
        match direction {
            PaymentDirection::Incoming => payment
                .customer_id
                .or_else(|| payment.allocations.iter().find_map(|a| a.customer_id))
                .map(Party::Customer),
            PaymentDirection::Outgoing => payment
                .supplier_id
                .or_else(|| payment.allocations.iter().find_map(|a| a.supplier_id))
                .map(Party::Supplier),
        }
    }

    fn resolve_configured_account<R>(
        payment: &Payment,
        repository: &R,
        code: &str,
    ) -> Result<saldo_shared::types::AccountId, PaymentError>
    where
        R: LedgerRepository + ?Sized,
    {
        repository
            .account_by_code(payment.tenant_id, payment.company_id, code)
            .map(|account| account.id)
            .ok_or_else(|| PaymentError::ConfiguredAccountNotFound(code.to_string()))
    }

    fn failure_detail(err: &PaymentError) -> serde_json::Value {
        match err {
            PaymentError::ValidationFailed(violations) => serde_json::json!({
                "violations": violations
                    .iter()
                    .map(|v| serde_json::json!({"code": v.code, "message": v.message}))
                    .collect::<Vec<_>>(),
            }),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}
