//! Consolidation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use saldo_shared::types::EntityId;

use super::run::RunStatus;

/// Structural errors fatal to a consolidation run.
#[derive(Debug, Error)]
pub enum ConsolidationError {
    /// The run cannot move between these states.
    #[error("Invalid run transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: RunStatus,
        /// Requested status.
        to: RunStatus,
    },

    /// A run for the same (group, period) is already active.
    #[error("A consolidation run is already active for this group and period")]
    RunAlreadyActive,

    /// The group has no entities.
    #[error("Consolidation group has no entities")]
    EmptyGroup,

    /// An elimination or intercompany record references an entity outside
    /// the group.
    #[error("Unknown entity in consolidation input: {0}")]
    UnknownEntity(EntityId),

    /// Ownership percentage outside (0, 100].
    #[error("Entity {entity} has invalid ownership percentage {percent}")]
    InvalidOwnership {
        /// The offending entity.
        entity: EntityId,
        /// The declared percentage.
        percent: Decimal,
    },
}

impl ConsolidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_RUN_TRANSITION",
            Self::RunAlreadyActive => "RUN_ALREADY_ACTIVE",
            Self::EmptyGroup => "EMPTY_CONSOLIDATION_GROUP",
            Self::UnknownEntity(_) => "UNKNOWN_ENTITY",
            Self::InvalidOwnership { .. } => "INVALID_OWNERSHIP",
        }
    }
}

/// Per-entity data problems. Not fatal: the run degrades, counts the error,
/// and continues with the remaining entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityDataError {
    /// No trial balance data exists for the entity.
    #[error("No trial balance data for entity in period")]
    MissingData,

    /// The entity's data does not cover the requested period.
    #[error("Entity data does not cover the requested period")]
    OutOfPeriod,

    /// No translation rates available for the entity's currency.
    #[error("No translation rates for currency {0}")]
    MissingRates(String),
}
