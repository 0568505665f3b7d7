//! Payment and settlement domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{
    AccountId, BankAccountId, CompanyId, CustomerId, PaymentId, SupplierId, TenantId,
};

use crate::advance::AdvanceKey;
use crate::posting::ValidatedPosting;

/// Payment method enumeration. Methods outside this set are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Electronic bank transfer.
    BankTransfer,
    /// Cash.
    Cash,
    /// Cheque.
    Cheque,
    /// Credit card.
    CreditCard,
    /// Direct debit mandate.
    DirectDebit,
}

impl PaymentMethod {
    /// Parse a method from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bank_transfer" => Some(Self::BankTransfer),
            "cash" => Some(Self::Cash),
            "cheque" => Some(Self::Cheque),
            "credit_card" => Some(Self::CreditCard),
            "direct_debit" => Some(Self::DirectDebit),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::Cash => "cash",
            Self::Cheque => "cheque",
            Self::CreditCard => "credit_card",
            Self::DirectDebit => "direct_debit",
        }
    }
}

/// The kind of open document an allocation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Vendor bill (outgoing settlement against AP).
    Bill,
    /// Sales invoice (incoming settlement against AR).
    Invoice,
}

/// Settlement direction, derived from the allocation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received against invoices.
    Incoming,
    /// Money paid against bills.
    Outgoing,
}

/// One allocation of a payment against an open document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Bill or invoice.
    pub document_kind: DocumentKind,
    /// The settled document's number (e.g., `BILL-001`).
    pub document_ref: String,
    /// Amount allocated to this document, in the payment currency.
    pub amount: Decimal,
    /// The document's AP (bill) or AR (invoice) control account.
    pub settlement_account_id: AccountId,
    /// Required for bill allocations.
    pub supplier_id: Option<SupplierId>,
    /// Required for invoice allocations.
    pub customer_id: Option<CustomerId>,
}

/// A bank charge deducted as part of the settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankCharge {
    /// The charge account.
    pub account_id: AccountId,
    /// Charge amount in the payment currency.
    pub amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
}

/// A withholding tax line on the payment.
///
/// The clearing and payable accounts are resolved from configuration, not
/// carried on the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithholdingTax {
    /// Withheld amount in the payment currency.
    pub amount: Decimal,
    /// Tax certificate reference, if issued.
    pub certificate_ref: Option<String>,
}

/// A payment settlement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Business payment number; the journal number is derived as
    /// `PAY-<payment number>`.
    pub payment_number: String,
    /// Payment method.
    pub method: PaymentMethod,
    /// The settlement bank account.
    pub bank_account_id: BankAccountId,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Payment currency (ISO 4217).
    pub currency: String,
    /// Exchange rate to base currency; required when the payment currency
    /// differs from the base currency.
    pub exchange_rate: Option<Decimal>,
    /// Payment amount in the payment currency.
    pub amount: Decimal,
    /// The paying customer, for incoming settlements.
    pub customer_id: Option<CustomerId>,
    /// The paid supplier, for outgoing settlements.
    pub supplier_id: Option<SupplierId>,
    /// Allocations against open documents.
    pub allocations: Vec<PaymentAllocation>,
    /// Bank charges.
    #[serde(default)]
    pub bank_charges: Vec<BankCharge>,
    /// Withholding tax lines.
    #[serde(default)]
    pub withholding: Vec<WithholdingTax>,
    /// Free-form description.
    pub description: Option<String>,
}

impl Payment {
    /// Sum of allocation amounts.
    #[must_use]
    pub fn total_allocated(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// Sum of bank charges.
    #[must_use]
    pub fn total_charges(&self) -> Decimal {
        self.bank_charges.iter().map(|c| c.amount).sum()
    }

    /// Sum of withholding tax lines.
    #[must_use]
    pub fn total_withholding(&self) -> Decimal {
        self.withholding.iter().map(|w| w.amount).sum()
    }

    /// The unallocated remainder that becomes an advance when positive:
    /// amount - allocations - charges - withholding.
    #[must_use]
    pub fn remainder(&self) -> Decimal {
        self.amount - self.total_allocated() - self.total_charges() - self.total_withholding()
    }

    /// Settlement direction derived from the allocation set; `None` when
    /// the set is empty or mixes bills and invoices.
    #[must_use]
    pub fn direction(&self) -> Option<PaymentDirection> {
        let mut kinds = self.allocations.iter().map(|a| a.document_kind);
        let first = kinds.next()?;
        if kinds.any(|k| k != first) {
            return None;
        }
        Some(match first {
            DocumentKind::Bill => PaymentDirection::Outgoing,
            DocumentKind::Invoice => PaymentDirection::Incoming,
        })
    }
}

/// The advance sub-ledger movement a settlement produced.
///
/// Committed in the same transaction as the journal; the amount is in the
/// payment currency, matching the advance key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceUpdate {
    /// The advance balance key.
    pub key: AdvanceKey,
    /// The advance account carrying the balance.
    pub account_id: AccountId,
    /// The credited amount (the overpayment remainder).
    pub amount: Decimal,
    /// The balance after the update.
    pub new_balance: Decimal,
}

/// Result of a successful settlement: a validated journal plus the advance
/// movement, to be committed as one atomic unit.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// The validated, balanced journal.
    pub posting: ValidatedPosting,
    /// The advance movement, when the payment overpaid.
    pub advance_update: Option<AdvanceUpdate>,
    /// Number of allocations settled.
    pub allocations_processed: usize,
    /// The payment amount converted to base currency.
    pub converted_total: Decimal,
}
