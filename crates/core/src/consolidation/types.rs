//! Consolidation domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{CompanyId, ConsolidationGroupId, EliminationEntryId, EntityId};

use super::run::ConsolidationRun;
use crate::account::AccountType;

/// How an entity's balances enter the consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationMethod {
    /// 100% of balances, regardless of ownership.
    Full,
    /// Balances scaled by the ownership percentage.
    Proportional,
    /// No line-by-line aggregation; the investment is carried at equity.
    Equity,
}

/// Which rate translates an entity's trial balance into the group
/// reporting currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    /// Period-end closing rate.
    ClosingRate,
    /// Period average rate.
    AverageRate,
}

/// Nature of control over the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Majority-controlled subsidiary.
    Subsidiary,
    /// Jointly controlled venture.
    JointVenture,
    /// Significant influence without control.
    Associate,
}

/// A company participating in a consolidation group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationEntity {
    /// Entity identifier within the group.
    pub entity_id: EntityId,
    /// The underlying company.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Ownership percentage in (0, 100].
    pub ownership_percent: Decimal,
    /// Consolidation method.
    pub method: ConsolidationMethod,
    /// The entity's functional currency (ISO 4217).
    pub functional_currency: String,
    /// Translation method for foreign-currency balances.
    pub translation_method: TranslationMethod,
    /// Nature of control.
    pub control_type: ControlType,
}

/// A consolidation group and its member entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationGroup {
    /// Group identifier.
    pub id: ConsolidationGroupId,
    /// Group name.
    pub name: String,
    /// Group reporting currency (ISO 4217).
    pub reporting_currency: String,
    /// Member entities.
    pub entities: Vec<ConsolidationEntity>,
}

impl ConsolidationGroup {
    /// Returns true if `entity_id` belongs to the group.
    #[must_use]
    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entities.iter().any(|e| e.entity_id == entity_id)
    }
}

/// Closing and average rates for translating one currency into the group
/// reporting currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TranslationRates {
    /// Period-end closing rate.
    pub closing: Decimal,
    /// Period average rate.
    pub average: Decimal,
}

/// One row of an entity's trial balance, in the entity's functional
/// currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTbRow {
    /// Account code (group chart).
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debit.
    pub debit: Decimal,
    /// Total credit.
    pub credit: Decimal,
}

/// An entity's trial balance for the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTrialBalance {
    /// The entity the balance belongs to.
    pub entity_id: EntityId,
    /// The currency the rows are stated in.
    pub currency: String,
    /// Per-account rows.
    pub rows: Vec<EntityTbRow>,
}

/// Kind of intercompany balance removed by an elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationType {
    /// Intercompany revenue/expense.
    IntercompanySales,
    /// Intercompany receivables.
    IntercompanyReceivables,
    /// Intercompany payables.
    IntercompanyPayables,
    /// Parent investment against subsidiary equity.
    InvestmentElimination,
}

/// Approval state of a manual elimination entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Being drafted.
    Draft,
    /// Waiting for approval.
    Pending,
    /// Approved for inclusion in finalized runs.
    Approved,
    /// Rejected.
    Rejected,
}

/// An adjustment removing intercompany balances.
///
/// Automatic entries are generated from matched intercompany pairs; manual
/// entries require approval before a finalized run includes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliminationEntry {
    /// Unique identifier.
    pub id: EliminationEntryId,
    /// Kind of elimination.
    pub elimination_type: EliminationType,
    /// Description.
    pub description: String,
    /// Account code receiving the elimination debit.
    pub debit_account: String,
    /// Account code receiving the elimination credit.
    pub credit_account: String,
    /// Eliminated amount in the group reporting currency.
    pub amount: Decimal,
    /// Entity whose books carry the balance.
    pub source_entity: EntityId,
    /// The counterparty entity.
    pub counterparty_entity: EntityId,
    /// Approval state (auto-generated entries are approved by construction).
    pub approval_status: ApprovalStatus,
    /// Whether the entry was machine-generated from matched pairs.
    pub auto_generated: bool,
}

/// Which side of an intercompany balance an entity declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntercompanyRole {
    /// The entity holds a receivable from the counterparty.
    Receivable,
    /// The entity owes a payable to the counterparty.
    Payable,
}

/// One side of an intercompany balance as declared by an entity, stated in
/// the group reporting currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntercompanyRecord {
    /// The declaring entity.
    pub entity_id: EntityId,
    /// The counterparty entity.
    pub counterparty_id: EntityId,
    /// Receivable or payable.
    pub role: IntercompanyRole,
    /// The account carrying the balance.
    pub account_code: String,
    /// The declared amount.
    pub amount: Decimal,
}

/// One consolidated trial balance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedRow {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Aggregated debits before elimination.
    pub pre_elimination_debit: Decimal,
    /// Aggregated credits before elimination.
    pub pre_elimination_credit: Decimal,
    /// Elimination debits applied.
    pub elimination_debit: Decimal,
    /// Elimination credits applied.
    pub elimination_credit: Decimal,
    /// Signed post-elimination balance (debit-positive).
    pub post_elimination_balance: Decimal,
    /// Entities contributing to the row.
    pub contributing_entities: Vec<EntityId>,
}

/// An entity's share of the consolidated totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityContribution {
    /// The entity.
    pub entity_id: EntityId,
    /// Consolidated amount contributed (sum of translated debits).
    pub amount: Decimal,
    /// Percentage of the consolidated total; contributions sum to 100.
    pub percent: Decimal,
}

/// Output of a consolidation run.
#[derive(Debug, Clone)]
pub struct ConsolidationResult {
    /// The final run record (terminal state, counters, error count).
    pub run: ConsolidationRun,
    /// Consolidated rows ordered by account code.
    pub rows: Vec<ConsolidatedRow>,
    /// Per-entity contribution summary.
    pub contributions: Vec<EntityContribution>,
    /// Eliminations included in the run.
    pub eliminations_applied: Vec<EliminationEntryId>,
    /// Intercompany declarations that found no matching counterparty.
    pub unmatched_intercompany: u32,
    /// Entities with complete, validated data over total entities (0..=1).
    pub completeness_score: Decimal,
}
