//! Report data types.
//!
//! All amounts follow the signed debit-positive convention internally;
//! statement sections present them on the account's normal side.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{AccountId, DimensionValueId, JournalId};

use super::error::ReportError;
use crate::account::AccountType;

/// A reporting period (inclusive date range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// Creates a period, validating the range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// One posted journal line as read back from the store. Amounts are in the
/// company's base currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedJournalLine {
    /// The journal the line belongs to.
    pub journal_id: JournalId,
    /// The account posted to.
    pub account_id: AccountId,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Dimension value tags.
    #[serde(default)]
    pub dimensions: Vec<DimensionValueId>,
}

impl PostedJournalLine {
    /// Signed amount: positive for debit, negative for credit.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Report generation options.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// When non-empty, only lines tagged with every listed dimension value
    /// (cost center, department, branch, territory, project) are included.
    pub dimensions: Vec<DimensionValueId>,
}

impl ReportOptions {
    /// Returns true if `line` passes the dimension filter.
    #[must_use]
    pub fn includes(&self, line: &PostedJournalLine) -> bool {
        self.dimensions
            .iter()
            .all(|wanted| line.dimensions.contains(wanted))
    }
}

/// Per-account trial balance aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Signed balance before the period (debit-positive).
    pub opening_balance: Decimal,
    /// Debits posted within the period.
    pub period_debit: Decimal,
    /// Credits posted within the period.
    pub period_credit: Decimal,
    /// Closing balance shown in the debit column (0 when credit-side).
    pub closing_debit: Decimal,
    /// Closing balance shown in the credit column (0 when debit-side).
    pub closing_credit: Decimal,
}

/// Trial balance totals and the balancing verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of the closing debit column.
    pub total_debit: Decimal,
    /// Sum of the closing credit column.
    pub total_credit: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
    /// Signed difference (total_debit - total_credit), reported as-is.
    pub difference: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// The reporting period.
    pub period: ReportPeriod,
    /// Reporting currency (the company's base currency).
    pub currency: String,
    /// Per-account rows, ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// One account line inside a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAccount {
    /// Account ID; `None` for derived rows (e.g., net income to date).
    pub account_id: Option<AccountId>,
    /// Account code; empty for derived rows.
    pub code: String,
    /// Display label.
    pub name: String,
    /// Amount presented on the section's normal side.
    pub amount: Decimal,
}

/// A named statement section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<SectionAccount>,
}

impl StatementSection {
    /// Adds an account row and bumps the section total.
    pub fn push(&mut self, account: SectionAccount) {
        self.total += account.amount;
        self.accounts.push(account);
    }
}

/// Balance sheet report.
///
/// The `difference` field is the system's primary correctness signal and is
/// always populated; a non-zero value indicates a posting defect upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Statement date.
    pub as_of: NaiveDate,
    /// Reporting currency.
    pub currency: String,
    /// Current assets.
    pub current_assets: StatementSection,
    /// Non-current assets.
    pub non_current_assets: StatementSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Current liabilities.
    pub current_liabilities: StatementSection,
    /// Non-current liabilities.
    pub non_current_liabilities: StatementSection,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Equity, including net income to date.
    pub equity: StatementSection,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
    /// Signed difference: total_assets - (total_liabilities + total_equity).
    pub difference: Decimal,
}

/// Profit & loss report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossReport {
    /// The reporting period.
    pub period: ReportPeriod,
    /// Reporting currency.
    pub currency: String,
    /// Revenue.
    pub revenue: StatementSection,
    /// Cost of goods sold.
    pub cost_of_goods_sold: StatementSection,
    /// Gross profit (revenue - COGS).
    pub gross_profit: Decimal,
    /// Operating expenses.
    pub operating_expenses: StatementSection,
    /// Operating income (gross profit - operating expenses).
    pub operating_income: Decimal,
    /// Other income less other expenses (signed).
    pub other_income_expense: StatementSection,
    /// Net income.
    pub net_income: Decimal,
}

/// One movement line in a cash flow section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowItem {
    /// Label (account name or derived row).
    pub label: String,
    /// Signed cash effect.
    pub amount: Decimal,
}

/// A cash flow activity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSection {
    /// Section total (signed cash effect).
    pub total: Decimal,
    /// Contributing movements.
    pub items: Vec<CashFlowItem>,
}

impl CashFlowSection {
    /// Adds a movement and bumps the section total.
    pub fn push(&mut self, item: CashFlowItem) {
        self.total += item.amount;
        self.items.push(item);
    }
}

/// Cash flow statement (indirect method).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// The reporting period.
    pub period: ReportPeriod,
    /// Reporting currency.
    pub currency: String,
    /// Operating activities (starts from net income).
    pub operating: CashFlowSection,
    /// Investing activities.
    pub investing: CashFlowSection,
    /// Financing activities.
    pub financing: CashFlowSection,
    /// Net cash movement (operating + investing + financing).
    pub net_change: Decimal,
    /// Cash balance at period start.
    pub opening_cash: Decimal,
    /// Cash balance at period end.
    pub closing_cash: Decimal,
    /// Whether the derived net change matches the actual cash-account
    /// movement within tolerance.
    pub is_reconciled: bool,
    /// Signed difference between derived net change and actual movement.
    pub difference: Decimal,
}
