//! Journal posting domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{
    AccountId, CompanyId, DimensionValueId, JournalId, JournalLineId, TenantId, UserId,
};

/// Voucher type classification for postings.
///
/// Segregation-of-duties rules are evaluated per voucher type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    /// General journal entry.
    Journal,
    /// Payment (incoming or outgoing settlement).
    Payment,
    /// Money received against invoices.
    Receipt,
    /// Sales invoice posting.
    SalesInvoice,
    /// Vendor bill posting.
    PurchaseBill,
    /// Adjustment entry.
    Adjustment,
    /// Reversal of a previously posted journal.
    Reversal,
}

impl VoucherType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Journal => "journal",
            Self::Payment => "payment",
            Self::Receipt => "receipt",
            Self::SalesInvoice => "sales_invoice",
            Self::PurchaseBill => "purchase_bill",
            Self::Adjustment => "adjustment",
            Self::Reversal => "reversal",
        }
    }
}

/// User role in the organization hierarchy.
///
/// Roles are ordered from lowest to highest privilege. The core passes the
/// acting role to the external SoD oracle; it does not interpret the
/// hierarchy itself beyond ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can only view postings.
    Viewer = 0,
    /// Can create and submit postings.
    Submitter = 1,
    /// Can approve postings within their limit.
    Approver = 2,
    /// Can approve and post.
    Accountant = 3,
    /// Full access except ownership transfer.
    Admin = 4,
    /// Full access.
    Owner = 5,
}

impl UserRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "submitter" => Some(Self::Submitter),
            "approver" => Some(Self::Approver),
            "accountant" => Some(Self::Accountant),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Submitter => "submitter",
            Self::Approver => "approver",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

/// Context a posting is submitted under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PostingContext {
    /// Tenant the posting belongs to.
    pub tenant_id: TenantId,
    /// Company within the tenant.
    pub company_id: CompanyId,
    /// Acting user.
    pub user_id: UserId,
    /// Acting user's role.
    pub role: UserRole,
}

/// One posting line. Exactly one of `debit`/`credit` is nonzero and neither
/// is negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// The account posted to.
    pub account_id: AccountId,
    /// Debit amount in the journal currency (>= 0).
    pub debit: Decimal,
    /// Credit amount in the journal currency (>= 0).
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Optional document reference (e.g., bill number).
    pub reference: Option<String>,
    /// Dimension value tags for analytical reporting.
    #[serde(default)]
    pub dimensions: Vec<DimensionValueId>,
}

impl JournalLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            id: JournalLineId::new(),
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: Some(description.into()),
            reference: None,
            dimensions: Vec::new(),
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            id: JournalLineId::new(),
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: Some(description.into()),
            reference: None,
            dimensions: Vec::new(),
        }
    }

    /// Attaches a document reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A journal posting: header plus an ordered sequence of lines.
///
/// Posted journals are immutable; corrections are made via reversing
/// entries, never by mutating posted lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: JournalId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Deterministic journal number (e.g., `PAY-2026-0042`).
    pub journal_number: String,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Journal currency (ISO 4217); line amounts are in this currency's
    /// base-converted form.
    pub currency: String,
    /// Voucher type for SoD evaluation.
    pub voucher_type: VoucherType,
    /// Description.
    pub description: String,
    /// The posting lines.
    pub lines: Vec<JournalLine>,
}

impl Journal {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Builds the reversing journal for this posting: every line mirrored
    /// (debits become credits and vice versa) under a `REV-` number.
    ///
    /// This is the only correction path for a posted journal.
    #[must_use]
    pub fn reversal_of(&self, reversal_date: NaiveDate) -> Self {
        Self {
            id: JournalId::new(),
            tenant_id: self.tenant_id,
            company_id: self.company_id,
            journal_number: format!("REV-{}", self.journal_number),
            posting_date: reversal_date,
            currency: self.currency.clone(),
            voucher_type: VoucherType::Reversal,
            description: format!("Reversal of {}", self.journal_number),
            lines: self
                .lines
                .iter()
                .map(|line| JournalLine {
                    id: JournalLineId::new(),
                    account_id: line.account_id,
                    debit: line.credit,
                    credit: line.debit,
                    description: line.description.clone(),
                    reference: Some(self.journal_number.clone()),
                    dimensions: line.dimensions.clone(),
                })
                .collect(),
        }
    }
}

/// A posting that passed all validation checks.
///
/// Echoes the normalized input (amounts rounded to the minor unit) together
/// with its totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedPosting {
    /// The normalized journal.
    pub journal: Journal,
    /// Total debits in the journal currency.
    pub total_debits: Decimal,
    /// Total credits in the journal currency.
    pub total_credits: Decimal,
}
