//! Multi-entity consolidation engine.
//!
//! Aggregates per-entity trial balances for a consolidation group and
//! period, translates foreign-currency entities into the group reporting
//! currency, applies intercompany elimination rules, and produces a
//! consolidated trial balance. Runs are long-running jobs observed by
//! polling: the tracker serves cloned snapshots with monotonic progress.

pub mod engine;
pub mod error;
pub mod run;
pub mod tracker;
pub mod types;

pub use engine::ConsolidationEngine;
pub use error::{ConsolidationError, EntityDataError};
pub use run::{ConsolidationRun, RunStatus};
pub use tracker::{RunHandle, RunTracker};
pub use types::{
    ApprovalStatus, ConsolidatedRow, ConsolidationEntity, ConsolidationGroup,
    ConsolidationMethod, ConsolidationResult, ControlType, EliminationEntry, EliminationType,
    EntityContribution, EntityTbRow, EntityTrialBalance, IntercompanyRecord, IntercompanyRole,
    TranslationMethod, TranslationRates,
};
