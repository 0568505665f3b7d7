//! Structured audit events.
//!
//! The core emits posting and consolidation lifecycle events; delivery and
//! storage are external concerns behind the [`AuditSink`] trait.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saldo_shared::types::{CompanyId, ConsolidationRunId, JournalId, TenantId};

/// A structured audit event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A journal passed validation and was handed off for commit.
    PostingSucceeded {
        /// Tenant scope.
        tenant_id: TenantId,
        /// Company scope.
        company_id: CompanyId,
        /// The validated journal.
        journal_id: JournalId,
        /// The deterministic journal number.
        journal_number: String,
        /// Total posted amount (sum of debits).
        total: Decimal,
    },
    /// A posting was rejected.
    PostingFailed {
        /// Tenant scope.
        tenant_id: TenantId,
        /// Company scope.
        company_id: CompanyId,
        /// The journal number that failed, when one was assigned.
        journal_number: Option<String>,
        /// Machine-readable rejection code.
        code: String,
        /// Free-form failure detail.
        detail: serde_json::Value,
    },
    /// A consolidation run changed state.
    ConsolidationRunTransitioned {
        /// The run that transitioned.
        run_id: ConsolidationRunId,
        /// State before the transition.
        from: String,
        /// State after the transition.
        to: String,
    },
}

/// Sink for audit events. Implementations must be cheap and non-blocking;
/// durable delivery is the implementor's concern.
pub trait AuditSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: AuditEvent);
}

/// Sink that discards all events.
#[derive(Debug, Default)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Sink that retains events in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: std::sync::Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    #[must_use]
    pub fn recorded(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemorySink {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.record(AuditEvent::ConsolidationRunTransitioned {
            run_id: ConsolidationRunId::new(),
            from: "pending".to_string(),
            to: "running".to_string(),
        });
        sink.record(AuditEvent::PostingSucceeded {
            tenant_id: TenantId::new(),
            company_id: CompanyId::new(),
            journal_id: JournalId::new(),
            journal_number: "PAY-001".to_string(),
            total: dec!(500.00),
        });

        let events = sink.recorded();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            AuditEvent::ConsolidationRunTransitioned { .. }
        ));
        assert!(matches!(events[1], AuditEvent::PostingSucceeded { .. }));
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = AuditEvent::PostingFailed {
            tenant_id: TenantId::new(),
            company_id: CompanyId::new(),
            journal_number: Some("PAY-002".to_string()),
            code: "UNBALANCED_JOURNAL".to_string(),
            detail: serde_json::json!({"debits": "100.00", "credits": "50.00"}),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "posting_failed");
        assert_eq!(json["code"], "UNBALANCED_JOURNAL");
    }
}
