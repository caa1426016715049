//! Out-of-band workflow result handler.
//!
//! Subscribed to `workflow.result.received` on the event bus. Validates
//! the delivered payload and records it into the live session's secondary
//! slot; the coordinator silently discards stale and duplicate tokens, so
//! this handler never errors on them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::coordinator::{AnalysisCoordinator, MergeOutcome};
use crate::domain::analysis::{SectionResult, WorkflowResultReceived};
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventSubscriber, ShapeValidator};

/// Records out-of-band workflow results into the coordinator.
pub struct WorkflowNotificationHandler {
    coordinator: Arc<AnalysisCoordinator>,
    shapes: Arc<dyn ShapeValidator>,
}

impl WorkflowNotificationHandler {
    /// Creates the handler.
    pub fn new(coordinator: Arc<AnalysisCoordinator>, shapes: Arc<dyn ShapeValidator>) -> Self {
        Self {
            coordinator,
            shapes,
        }
    }

    /// Creates as an Arc (for sharing with an event subscriber).
    pub fn new_shared(
        coordinator: Arc<AnalysisCoordinator>,
        shapes: Arc<dyn ShapeValidator>,
    ) -> Arc<Self> {
        Arc::new(Self::new(coordinator, shapes))
    }

    /// Registers this handler with an event subscriber.
    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe(
            crate::domain::analysis::WORKFLOW_RESULT_RECEIVED,
            self.clone(),
        );
    }
}

#[async_trait]
impl EventHandler for WorkflowNotificationHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let notification: WorkflowResultReceived = event.payload_as()?;
        let token = notification.token;

        // A shape failure is a producer failure: fill the slot with the
        // failed placeholder so the merge still completes.
        let result = match self.shapes.validate_workflow_result(&notification.result) {
            Ok(()) => SectionResult::ready(notification.result),
            Err(violations) => {
                debug!(%token, error = %violations, "workflow result failed validation");
                SectionResult::failed(format!("workflow analysis failed: {}", violations))
            }
        };

        let outcome = self.coordinator.record_secondary(token, result).await;
        match outcome {
            MergeOutcome::Merged => debug!(%token, "workflow result completed the merge"),
            MergeOutcome::Recorded => debug!(%token, "workflow result recorded, awaiting primary"),
            MergeOutcome::Duplicate | MergeOutcome::Stale => {
                debug!(%token, ?outcome, "workflow result discarded")
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "WorkflowNotificationHandler"
    }
}
