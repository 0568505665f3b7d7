//! Run registry for polling and single-active-run enforcement.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use saldo_shared::types::ConsolidationGroupId;

use super::error::ConsolidationError;
use super::run::ConsolidationRun;
use crate::reports::ReportPeriod;

/// Shared handle to a run; the engine mutates it, pollers snapshot it.
pub type RunHandle = Arc<RwLock<ConsolidationRun>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RunKey {
    group_id: ConsolidationGroupId,
    period: ReportPeriod,
}

/// Tracks consolidation runs per (group, period).
///
/// Only one non-terminal run may exist per key; registering a second is
/// rejected. Callers poll state via [`RunTracker::snapshot`] - there is no
/// blocking wait and no cancellation.
#[derive(Debug, Default)]
pub struct RunTracker {
    runs: DashMap<RunKey, RunHandle>,
}

impl RunTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a run and returns its shared handle.
    ///
    /// # Errors
    ///
    /// Returns `RunAlreadyActive` if a non-terminal run exists for the
    /// same (group, period).
    pub fn register(&self, run: ConsolidationRun) -> Result<RunHandle, ConsolidationError> {
        let key = RunKey {
            group_id: run.group_id,
            period: run.period,
        };
        let entry = self.runs.entry(key);
        match entry {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                let active = {
                    let existing = Self::read(occupied.get());
                    !existing.status.is_terminal()
                };
                if active {
                    return Err(ConsolidationError::RunAlreadyActive);
                }
                let handle: RunHandle = Arc::new(RwLock::new(run));
                occupied.insert(Arc::clone(&handle));
                Ok(handle)
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let handle: RunHandle = Arc::new(RwLock::new(run));
                vacant.insert(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }

    /// Returns a cloned snapshot of the tracked run for polling.
    #[must_use]
    pub fn snapshot(
        &self,
        group_id: ConsolidationGroupId,
        period: ReportPeriod,
    ) -> Option<ConsolidationRun> {
        let key = RunKey { group_id, period };
        self.runs.get(&key).map(|handle| Self::read(&handle).clone())
    }

    /// Reads through lock poisoning: a panicked engine thread must not make
    /// the run unobservable.
    fn read(handle: &RunHandle) -> std::sync::RwLockReadGuard<'_, ConsolidationRun> {
        match handle.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
