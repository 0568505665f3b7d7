//! Consolidation run state machine.
//!
//! `Pending -> Running -> {Completed | Failed}`. The transition to Running
//! is explicit so a run can be scheduled and started independently.
//! Progress only ever increases.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{ConsolidationGroupId, ConsolidationRunId};

use super::error::ConsolidationError;
use crate::reports::ReportPeriod;

/// Lifecycle state of a consolidation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Created, not yet started.
    Pending,
    /// Processing entities.
    Running,
    /// Finished; may carry a non-zero error count (partial degradation).
    Completed,
    /// Aborted by a structural error.
    Failed,
}

impl RunStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns true for terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A consolidation job record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRun {
    /// Unique identifier.
    pub id: ConsolidationRunId,
    /// The consolidated group.
    pub group_id: ConsolidationGroupId,
    /// The consolidated period.
    pub period: ReportPeriod,
    /// Current state.
    pub status: RunStatus,
    /// Monotonically increasing progress, 0..=100.
    pub progress_percent: u8,
    /// Total entities in the group.
    pub entities_total: u32,
    /// Entities processed so far (successes and errors).
    pub entities_processed: u32,
    /// Account rows accumulated.
    pub accounts_processed: u32,
    /// Elimination entries applied.
    pub eliminations_applied: u32,
    /// Sum of consolidated debits.
    pub total_amount_consolidated: Decimal,
    /// Number of entities skipped for data problems.
    pub error_count: u32,
    /// Messages for the skipped entities.
    pub errors: Vec<String>,
    /// Reason the run failed, for Failed runs.
    pub failure_reason: Option<String>,
}

impl ConsolidationRun {
    /// Creates a pending run.
    #[must_use]
    pub fn new(
        group_id: ConsolidationGroupId,
        period: ReportPeriod,
        entities_total: u32,
    ) -> Self {
        Self {
            id: ConsolidationRunId::new(),
            group_id,
            period,
            status: RunStatus::Pending,
            progress_percent: 0,
            entities_total,
            entities_processed: 0,
            accounts_processed: 0,
            eliminations_applied: 0,
            total_amount_consolidated: Decimal::ZERO,
            error_count: 0,
            errors: Vec::new(),
            failure_reason: None,
        }
    }

    /// Starts the run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the run is Pending.
    pub fn start(&mut self) -> Result<(), ConsolidationError> {
        self.transition(RunStatus::Pending, RunStatus::Running)
    }

    /// Completes the run. A non-zero `error_count` is allowed: partial
    /// entity coverage still completes, it never hides its errors.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the run is Running.
    pub fn complete(&mut self) -> Result<(), ConsolidationError> {
        self.transition(RunStatus::Running, RunStatus::Completed)?;
        self.progress_percent = 100;
        Ok(())
    }

    /// Fails the run with a structural reason.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the run is already terminal.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), ConsolidationError> {
        if self.status.is_terminal() {
            return Err(ConsolidationError::InvalidTransition {
                from: self.status,
                to: RunStatus::Failed,
            });
        }
        self.status = RunStatus::Failed;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Raises progress to `percent` (capped at 100). Progress never moves
    /// backwards.
    pub fn advance_progress(&mut self, percent: u8) {
        self.progress_percent = self.progress_percent.max(percent.min(100));
    }

    /// Records a successfully consolidated entity.
    pub fn record_entity_success(&mut self, accounts: u32, amount: Decimal) {
        self.entities_processed += 1;
        self.accounts_processed += accounts;
        self.total_amount_consolidated += amount;
    }

    /// Records an entity skipped for a data problem. The run continues.
    pub fn record_entity_error(&mut self, message: impl Into<String>) {
        self.entities_processed += 1;
        self.error_count += 1;
        self.errors.push(message.into());
    }

    fn transition(&mut self, from: RunStatus, to: RunStatus) -> Result<(), ConsolidationError> {
        if self.status != from {
            return Err(ConsolidationError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
