//! End-to-end settlement scenarios against the in-memory repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use saldo_shared::config::{AccountResolutionConfig, CoreConfig, ToleranceConfig};
use saldo_shared::types::{
    AccountId, BankAccountId, CompanyId, CustomerId, PaymentId, SupplierId, TenantId, UserId,
};

use crate::account::{Account, AccountSubtype, AccountType};
use crate::advance::{AdvanceKey, AdvanceLedger, Party};
use crate::audit::{AuditEvent, MemorySink};
use crate::payment::error::PaymentError;
use crate::payment::processor::SettlementProcessor;
use crate::payment::types::{
    BankCharge, DocumentKind, Payment, PaymentAllocation, PaymentMethod, WithholdingTax,
};
use crate::posting::{PostingContext, PostingError, UserRole, VoucherType};
use crate::repository::{BankAccountInfo, InMemoryRepository};

const BASE_CURRENCY: &str = "MYR";

struct Fixture {
    tenant_id: TenantId,
    company_id: CompanyId,
    bank_account_id: BankAccountId,
    bank_gl: AccountId,
    ar_account: AccountId,
    ap_account: AccountId,
    charge_account: AccountId,
    customer_id: CustomerId,
    supplier_id: SupplierId,
    repository: InMemoryRepository,
    config: CoreConfig,
    advance_ledger: AdvanceLedger,
    audit: MemorySink,
}

impl Fixture {
    fn new() -> Self {
        let tenant_id = TenantId::new();
        let company_id = CompanyId::new();
        let mut repository = InMemoryRepository::new();

        let mut add_account = |code: &str, account_type, subtype| {
            let account = Account {
                id: AccountId::new(),
                tenant_id,
                company_id,
                code: code.to_string(),
                name: format!("Account {code}"),
                account_type,
                subtype,
                parent_id: None,
                is_active: true,
                currency: BASE_CURRENCY.to_string(),
            };
            let id = account.id;
            repository.insert_account(account);
            id
        };

        let bank_gl = add_account("1100", AccountType::Asset, Some(AccountSubtype::CashAndBank));
        let ar_account = add_account(
            "1200",
            AccountType::Asset,
            Some(AccountSubtype::AccountsReceivable),
        );
        let ap_account = add_account(
            "2100",
            AccountType::Liability,
            Some(AccountSubtype::AccountsPayable),
        );
        let charge_account = add_account(
            "6300",
            AccountType::Expense,
            Some(AccountSubtype::OperatingExpense),
        );
        add_account(
            "2150",
            AccountType::Liability,
            Some(AccountSubtype::CustomerAdvance),
        );
        add_account(
            "1450",
            AccountType::Asset,
            Some(AccountSubtype::SupplierAdvance),
        );
        add_account("1460", AccountType::Asset, Some(AccountSubtype::CurrentAsset));
        add_account(
            "2250",
            AccountType::Liability,
            Some(AccountSubtype::WithholdingPayable),
        );

        let bank_account_id = BankAccountId::new();
        repository.insert_bank_account(BankAccountInfo {
            id: bank_account_id,
            gl_account_id: bank_gl,
            currency: BASE_CURRENCY.to_string(),
        });

        let customer_id = CustomerId::new();
        repository.insert_customer(
            customer_id,
            crate::repository::PartyRecord {
                currency: BASE_CURRENCY.to_string(),
            },
        );
        let supplier_id = SupplierId::new();
        repository.insert_supplier(
            supplier_id,
            crate::repository::PartyRecord {
                currency: BASE_CURRENCY.to_string(),
            },
        );

        let config = CoreConfig {
            tolerance: ToleranceConfig::default(),
            accounts: AccountResolutionConfig {
                customer_advance_code: "2150".to_string(),
                supplier_advance_code: "1450".to_string(),
                withholding_clearing_code: "1460".to_string(),
                withholding_payable_code: "2250".to_string(),
            },
        };

        Self {
            tenant_id,
            company_id,
            bank_account_id,
            bank_gl,
            ar_account,
            ap_account,
            charge_account,
            customer_id,
            supplier_id,
            repository,
            config,
            advance_ledger: AdvanceLedger::new(dec!(0.01)),
            audit: MemorySink::new(),
        }
    }

    fn ctx(&self) -> PostingContext {
        PostingContext {
            tenant_id: self.tenant_id,
            company_id: self.company_id,
            user_id: UserId::new(),
            role: UserRole::Accountant,
        }
    }

    fn today(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn bill_payment(&self, number: &str, amount: Decimal, allocated: Decimal) -> Payment {
        Payment {
            id: PaymentId::new(),
            tenant_id: self.tenant_id,
            company_id: self.company_id,
            payment_number: number.to_string(),
            method: PaymentMethod::BankTransfer,
            bank_account_id: self.bank_account_id,
            posting_date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            currency: BASE_CURRENCY.to_string(),
            exchange_rate: None,
            amount,
            customer_id: None,
            supplier_id: Some(self.supplier_id),
            allocations: vec![PaymentAllocation {
                document_kind: DocumentKind::Bill,
                document_ref: "BILL-001".to_string(),
                amount: allocated,
                settlement_account_id: self.ap_account,
                supplier_id: Some(self.supplier_id),
                customer_id: None,
            }],
            bank_charges: vec![],
            withholding: vec![],
            description: None,
        }
    }

    fn invoice_payment(&self, number: &str, amount: Decimal, allocated: Decimal) -> Payment {
        Payment {
            id: PaymentId::new(),
            tenant_id: self.tenant_id,
            company_id: self.company_id,
            payment_number: number.to_string(),
            method: PaymentMethod::BankTransfer,
            bank_account_id: self.bank_account_id,
            posting_date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            currency: BASE_CURRENCY.to_string(),
            exchange_rate: None,
            amount,
            customer_id: Some(self.customer_id),
            supplier_id: None,
            allocations: vec![PaymentAllocation {
                document_kind: DocumentKind::Invoice,
                document_ref: "INV-001".to_string(),
                amount: allocated,
                settlement_account_id: self.ar_account,
                supplier_id: None,
                customer_id: Some(self.customer_id),
            }],
            bank_charges: vec![],
            withholding: vec![],
            description: None,
        }
    }

    fn process(&self, payment: &Payment) -> Result<crate::payment::SettlementOutcome, PaymentError> {
        SettlementProcessor::process(
            payment,
            &self.ctx(),
            BASE_CURRENCY,
            &self.config,
            &self.repository,
            &self.advance_ledger,
            |_, _| true,
            &self.audit,
            self.today(),
        )
    }

    fn customer_advance_key(&self) -> AdvanceKey {
        AdvanceKey {
            tenant_id: self.tenant_id,
            company_id: self.company_id,
            party: Party::Customer(self.customer_id),
            currency: BASE_CURRENCY.to_string(),
        }
    }
}

#[test]
fn test_bill_fully_paid() {
    let fx = Fixture::new();
    let payment = fx.bill_payment("0001", dec!(500.00), dec!(500.00));

    let outcome = fx.process(&payment).unwrap();
    let journal = &outcome.posting.journal;

    assert_eq!(journal.journal_number, "PAY-0001");
    assert_eq!(journal.voucher_type, VoucherType::Payment);
    assert_eq!(outcome.allocations_processed, 1);
    assert!(outcome.advance_update.is_none());

    // One AP debit, one bank credit.
    assert_eq!(journal.lines.len(), 2);
    let ap_line = &journal.lines[0];
    assert_eq!(ap_line.account_id, fx.ap_account);
    assert_eq!(ap_line.debit, dec!(500.00));
    assert_eq!(ap_line.reference.as_deref(), Some("BILL-001"));
    let bank_line = &journal.lines[1];
    assert_eq!(bank_line.account_id, fx.bank_gl);
    assert_eq!(bank_line.credit, dec!(500.00));

    assert_eq!(outcome.posting.total_debits, outcome.posting.total_credits);
}

#[test]
fn test_invoice_overpayment_creates_advance() {
    let fx = Fixture::new();
    let payment = fx.invoice_payment("0002", dec!(350.00), dec!(300.00));

    let outcome = fx.process(&payment).unwrap();
    let journal = &outcome.posting.journal;

    // Bank debit 350, AR credit 300, customer advance credit 50.
    assert_eq!(journal.lines.len(), 3);
    assert_eq!(journal.lines[0].account_id, fx.bank_gl);
    assert_eq!(journal.lines[0].debit, dec!(350.00));
    assert_eq!(journal.lines[1].account_id, fx.ar_account);
    assert_eq!(journal.lines[1].credit, dec!(300.00));
    assert_eq!(journal.lines[2].credit, dec!(50.00));

    let update = outcome.advance_update.expect("advance expected");
    assert_eq!(update.amount, dec!(50.00));
    assert_eq!(update.new_balance, dec!(50.00));
    assert_eq!(
        fx.advance_ledger.balance(&fx.customer_advance_key()),
        Some(dec!(50.00))
    );
    assert_eq!(outcome.posting.total_debits, outcome.posting.total_credits);
}

#[test]
fn test_repeated_overpayment_increments_advance() {
    let fx = Fixture::new();
    fx.process(&fx.invoice_payment("0003", dec!(350.00), dec!(300.00)))
        .unwrap();
    let outcome = fx
        .process(&fx.invoice_payment("0004", dec!(320.00), dec!(300.00)))
        .unwrap();

    let update = outcome.advance_update.expect("advance expected");
    assert_eq!(update.amount, dec!(20.00));
    assert_eq!(update.new_balance, dec!(70.00));
}

#[test]
fn test_over_allocation_rejected_nothing_posted() {
    let fx = Fixture::new();
    let payment = fx.invoice_payment("0005", dec!(300.00), dec!(350.00));

    let err = fx.process(&payment).unwrap_err();
    match &err {
        PaymentError::ValidationFailed(violations) => {
            assert!(violations.iter().any(|v| v.code == "OVER_ALLOCATED"));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert_eq!(err.error_code(), "PAYMENT_VALIDATION_FAILED");
    // No sub-ledger movement happened.
    assert_eq!(fx.advance_ledger.balance(&fx.customer_advance_key()), None);
}

#[test]
fn test_foreign_bill_converts_at_document_rate() {
    let mut fx = Fixture::new();
    // A USD supplier paid from the MYR bank account: conversion through the
    // base-currency account is allowed.
    let usd_supplier = SupplierId::new();
    fx.repository.insert_supplier(
        usd_supplier,
        crate::repository::PartyRecord {
            currency: "USD".to_string(),
        },
    );

    let mut payment = fx.bill_payment("0006", dec!(100.00), dec!(100.00));
    payment.currency = "USD".to_string();
    payment.exchange_rate = Some(dec!(4.20));
    payment.supplier_id = Some(usd_supplier);
    payment.allocations[0].supplier_id = Some(usd_supplier);

    let outcome = fx.process(&payment).unwrap();
    let journal = &outcome.posting.journal;

    // 100.00 USD * 4.20 = 420.00 MYR on both sides.
    assert_eq!(outcome.converted_total, dec!(420.00));
    assert_eq!(journal.currency, "MYR");
    assert_eq!(journal.lines[0].debit, dec!(420.00));
    assert_eq!(journal.lines[1].credit, dec!(420.00));
}

#[test]
fn test_missing_rate_required() {
    let fx = Fixture::new();
    let mut payment = fx.bill_payment("0007", dec!(100.00), dec!(100.00));
    payment.currency = "USD".to_string();
    payment.exchange_rate = None;

    let err = fx.process(&payment).unwrap_err();
    assert_eq!(err.error_code(), "EXCHANGE_RATE_REQUIRED");
}

#[test]
fn test_zero_rate_invalid() {
    let fx = Fixture::new();
    let mut payment = fx.bill_payment("0008", dec!(100.00), dec!(100.00));
    payment.currency = "USD".to_string();
    payment.exchange_rate = Some(Decimal::ZERO);

    let err = fx.process(&payment).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_EXCHANGE_RATE");
}

#[test]
fn test_customer_currency_mismatch() {
    let mut fx = Fixture::new();
    let sgd_customer = CustomerId::new();
    fx.repository.insert_customer(
        sgd_customer,
        crate::repository::PartyRecord {
            currency: "SGD".to_string(),
        },
    );
    let mut payment = fx.invoice_payment("0009", dec!(100.00), dec!(100.00));
    payment.customer_id = Some(sgd_customer);
    payment.allocations[0].customer_id = Some(sgd_customer);

    let err = fx.process(&payment).unwrap_err();
    assert_eq!(err.error_code(), "CURRENCY_MISMATCH");
}

#[test]
fn test_foreign_bank_account_rejected_for_base_payment() {
    let mut fx = Fixture::new();
    let usd_bank = BankAccountId::new();
    fx.repository.insert_bank_account(BankAccountInfo {
        id: usd_bank,
        gl_account_id: fx.bank_gl,
        currency: "USD".to_string(),
    });
    let mut payment = fx.bill_payment("0010", dec!(100.00), dec!(100.00));
    payment.bank_account_id = usd_bank;

    let err = fx.process(&payment).unwrap_err();
    assert_eq!(err.error_code(), "CURRENCY_MISMATCH");
}

#[test]
fn test_incoming_with_charge_balances() {
    let fx = Fixture::new();
    let mut payment = fx.invoice_payment("0011", dec!(300.00), dec!(295.00));
    payment.bank_charges.push(BankCharge {
        account_id: fx.charge_account,
        amount: dec!(5.00),
        description: Some("Transfer fee".to_string()),
    });

    let outcome = fx.process(&payment).unwrap();
    let journal = &outcome.posting.journal;

    // Bank debit 300, AR credit 295, charge credit 5. No advance.
    assert_eq!(journal.lines.len(), 3);
    assert_eq!(journal.lines[0].debit, dec!(300.00));
    assert!(outcome.advance_update.is_none());
    assert_eq!(outcome.posting.total_debits, outcome.posting.total_credits);
}

#[test]
fn test_withholding_builds_balanced_pair() {
    let fx = Fixture::new();
    let mut payment = fx.invoice_payment("0012", dec!(1000.00), dec!(900.00));
    payment.withholding.push(WithholdingTax {
        amount: dec!(50.00),
        certificate_ref: Some("WHT-2026-17".to_string()),
    });

    let outcome = fx.process(&payment).unwrap();
    let journal = &outcome.posting.journal;

    // Bank debit net of withholding (950), AR credit 900, withholding pair
    // 50/50, advance credit 50.
    assert_eq!(journal.lines.len(), 5);
    assert_eq!(journal.lines[0].debit, dec!(950.00));
    assert_eq!(journal.lines[1].credit, dec!(900.00));
    assert_eq!(journal.lines[2].debit, dec!(50.00));
    assert_eq!(journal.lines[3].credit, dec!(50.00));
    assert_eq!(journal.lines[4].credit, dec!(50.00));
    assert_eq!(outcome.posting.total_debits, dec!(1000.00));
    assert_eq!(outcome.posting.total_credits, dec!(1000.00));

    let update = outcome.advance_update.expect("advance expected");
    assert_eq!(update.amount, dec!(50.00));
}

#[test]
fn test_sod_denial_rejects_journal() {
    let fx = Fixture::new();
    let payment = fx.invoice_payment("0013", dec!(350.00), dec!(300.00));

    let err = SettlementProcessor::process(
        &payment,
        &fx.ctx(),
        BASE_CURRENCY,
        &fx.config,
        &fx.repository,
        &fx.advance_ledger,
        |_, voucher| voucher != VoucherType::Payment,
        &fx.audit,
        fx.today(),
    )
    .unwrap_err();

    assert_eq!(err.error_code(), "JOURNAL_VALIDATION_FAILED");
    assert!(matches!(
        err,
        PaymentError::JournalRejected(PostingError::NotAuthorized { .. })
    ));
    // Rejected before the sub-ledger was touched.
    assert_eq!(fx.advance_ledger.balance(&fx.customer_advance_key()), None);
}

#[test]
fn test_audit_events_emitted() {
    let fx = Fixture::new();
    fx.process(&fx.bill_payment("0014", dec!(500.00), dec!(500.00)))
        .unwrap();
    fx.process(&fx.invoice_payment("0015", dec!(300.00), dec!(350.00)))
        .unwrap_err();

    let events = fx.audit.recorded();
    assert_eq!(events.len(), 2);
    match &events[0] {
        AuditEvent::PostingSucceeded {
            journal_number,
            total,
            ..
        } => {
            assert_eq!(journal_number, "PAY-0014");
            assert_eq!(*total, dec!(500.00));
        }
        other => panic!("expected PostingSucceeded, got {other:?}"),
    }
    match &events[1] {
        AuditEvent::PostingFailed { code, .. } => {
            assert_eq!(code, "PAYMENT_VALIDATION_FAILED");
        }
        other => panic!("expected PostingFailed, got {other:?}"),
    }
}
