//! Financial report generation.
//!
//! Pure, read-only statement generation from posted journal lines:
//! - Trial Balance (opening / period / closing)
//! - Balance Sheet (asserting assets = liabilities + equity)
//! - Profit & Loss
//! - Cash Flow Statement (indirect method)
//!
//! Generation is deterministic: the same committed data and period always
//! produce identical reports. Balance failures are reported with the signed
//! difference, never silently corrected.

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::{
    BalanceSheetReport, CashFlowItem, CashFlowReport, CashFlowSection, PostedJournalLine,
    ProfitLossReport, ReportOptions, ReportPeriod, SectionAccount, StatementSection,
    TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
};
