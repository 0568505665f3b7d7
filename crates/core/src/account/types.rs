//! Account tree node and classification types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use saldo_shared::types::{AccountId, CompanyId, TenantId};

/// Which side a positive balance naturally sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (assets, expenses).
    Debit,
    /// Credit-normal (liabilities, equity, revenue).
    Credit,
}

impl NormalBalance {
    /// Calculates the signed balance change for a posting against an account
    /// of this normal balance.
    ///
    /// Debit-normal: balance += debit - credit.
    /// Credit-normal: balance += credit - debit.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Top-level account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, equipment).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for balance sheet account types.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

/// Cash-flow statement activity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowActivity {
    /// Day-to-day trading movements (working capital).
    Operating,
    /// Acquisition/disposal of long-lived assets.
    Investing,
    /// Debt and equity funding movements.
    Financing,
}

/// Finer account classification driving statement sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountSubtype {
    /// Cash and bank balances.
    CashAndBank,
    /// Trade receivables (AR).
    AccountsReceivable,
    /// Advances paid to suppliers (prepayment asset).
    SupplierAdvance,
    /// Other current assets.
    CurrentAsset,
    /// Property, plant, equipment and other long-lived assets.
    NonCurrentAsset,
    /// Trade payables (AP).
    AccountsPayable,
    /// Advances received from customers (prepayment liability).
    CustomerAdvance,
    /// Withholding tax owed to the tax authority.
    WithholdingPayable,
    /// Other current liabilities.
    CurrentLiability,
    /// Loans and other long-term obligations.
    NonCurrentLiability,
    /// Contributed capital.
    ShareCapital,
    /// Accumulated earnings.
    RetainedEarnings,
    /// Core trading income.
    OperatingRevenue,
    /// Non-trading income.
    OtherIncome,
    /// Direct cost of goods/services sold.
    CostOfGoodsSold,
    /// Operating expenses.
    OperatingExpense,
    /// Non-operating expenses (interest, FX losses).
    OtherExpense,
}

impl AccountSubtype {
    /// Returns the account type this subtype belongs to.
    #[must_use]
    pub const fn expected_type(self) -> AccountType {
        match self {
            Self::CashAndBank
            | Self::AccountsReceivable
            | Self::SupplierAdvance
            | Self::CurrentAsset
            | Self::NonCurrentAsset => AccountType::Asset,
            Self::AccountsPayable
            | Self::CustomerAdvance
            | Self::WithholdingPayable
            | Self::CurrentLiability
            | Self::NonCurrentLiability => AccountType::Liability,
            Self::ShareCapital | Self::RetainedEarnings => AccountType::Equity,
            Self::OperatingRevenue | Self::OtherIncome => AccountType::Revenue,
            Self::CostOfGoodsSold | Self::OperatingExpense | Self::OtherExpense => {
                AccountType::Expense
            }
        }
    }

    /// Returns true if the subtype belongs to the current section of the
    /// balance sheet. Meaningless for revenue/expense subtypes.
    #[must_use]
    pub const fn is_current(self) -> bool {
        matches!(
            self,
            Self::CashAndBank
                | Self::AccountsReceivable
                | Self::SupplierAdvance
                | Self::CurrentAsset
                | Self::AccountsPayable
                | Self::CustomerAdvance
                | Self::WithholdingPayable
                | Self::CurrentLiability
        )
    }

    /// Cash-flow activity this subtype's movements belong to, for balance
    /// sheet subtypes. Cash itself and P&L subtypes return `None`.
    #[must_use]
    pub const fn cash_flow_activity(self) -> Option<CashFlowActivity> {
        match self {
            Self::AccountsReceivable
            | Self::SupplierAdvance
            | Self::CurrentAsset
            | Self::AccountsPayable
            | Self::CustomerAdvance
            | Self::WithholdingPayable
            | Self::CurrentLiability => Some(CashFlowActivity::Operating),
            Self::NonCurrentAsset => Some(CashFlowActivity::Investing),
            Self::NonCurrentLiability | Self::ShareCapital => Some(CashFlowActivity::Financing),
            Self::CashAndBank
            | Self::RetainedEarnings
            | Self::OperatingRevenue
            | Self::OtherIncome
            | Self::CostOfGoodsSold
            | Self::OperatingExpense
            | Self::OtherExpense => None,
        }
    }
}

/// A node in the chart of accounts tree.
///
/// Code is unique per (tenant, company); uniqueness is enforced by the
/// persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Account code, unique per (tenant, company).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Top-level classification.
    pub account_type: AccountType,
    /// Finer classification for statement sections.
    pub subtype: Option<AccountSubtype>,
    /// Parent account in the tree, if any.
    pub parent_id: Option<AccountId>,
    /// Whether the account accepts postings.
    pub is_active: bool,
    /// Account currency (ISO 4217).
    pub currency: String,
}

impl Account {
    /// Returns the normal balance side for this account.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Validates that this account may sit under `parent` in the tree:
    /// a leaf's type must be compatible with its parent's type, and the
    /// subtype (when set) must belong to the account's own type.
    ///
    /// # Errors
    ///
    /// Returns an error naming the mismatched classification.
    pub fn validate_hierarchy(&self, parent: &Account) -> Result<(), AccountHierarchyError> {
        if self.account_type != parent.account_type {
            return Err(AccountHierarchyError::TypeMismatch {
                child: self.account_type,
                parent: parent.account_type,
            });
        }
        if let Some(subtype) = self.subtype
            && subtype.expected_type() != self.account_type
        {
            return Err(AccountHierarchyError::SubtypeMismatch {
                subtype,
                account_type: self.account_type,
            });
        }
        Ok(())
    }
}

/// Errors from chart of accounts hierarchy validation.
#[derive(Debug, Error)]
pub enum AccountHierarchyError {
    /// Child account type differs from its parent's type.
    #[error("Account type {child:?} is not compatible with parent type {parent:?}")]
    TypeMismatch {
        /// The child account's type.
        child: AccountType,
        /// The parent account's type.
        parent: AccountType,
    },

    /// Subtype does not belong to the account's type.
    #[error("Subtype {subtype:?} does not belong to account type {account_type:?}")]
    SubtypeMismatch {
        /// The offending subtype.
        subtype: AccountSubtype,
        /// The account's declared type.
        account_type: AccountType,
    },
}
