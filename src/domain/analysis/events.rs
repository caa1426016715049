//! Domain events for the analysis module.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{CorrelationToken, EventEnvelope, Timestamp};

/// Event type published when the workflow callback delivers a result.
pub const WORKFLOW_RESULT_RECEIVED: &str = "workflow.result.received";

/// Out-of-band workflow result, keyed by the correlation token of the
/// session that triggered the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResultReceived {
    /// Token identifying the triggering session.
    pub token: CorrelationToken,
    /// Raw analytical payload delivered by the workflow.
    pub result: JsonValue,
    /// When the callback was accepted.
    pub received_at: Timestamp,
}

impl WorkflowResultReceived {
    /// Creates the event for a freshly accepted callback.
    pub fn new(token: CorrelationToken, result: JsonValue) -> Self {
        Self {
            token,
            result,
            received_at: Timestamp::now(),
        }
    }

    /// Wraps this event in a transport envelope, correlated by token.
    pub fn to_envelope(&self) -> EventEnvelope {
        EventEnvelope::new(
            WORKFLOW_RESULT_RECEIVED,
            serde_json::to_value(self).unwrap_or(JsonValue::Null),
        )
        .with_correlation_id(self.token.to_string())
    }
}
