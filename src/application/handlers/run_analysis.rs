//! Launcher for the dual-producer analysis kinds.
//!
//! The Gathering phase runs synchronously: input validation, text
//! extraction, context snapshot, session creation. Both producers are then
//! launched as independent tasks that report into the coordinator under the
//! session's correlation token; the handler returns the token without
//! waiting for either. Producer failures degrade to section placeholders so
//! the merge always completes; only setup failures surface as errors.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::coordinator::AnalysisCoordinator;
use crate::domain::analysis::{
    AnalysisKind, AttachedFile, ContextSnapshot, ParetoAnalyzer, SectionResult,
};
use crate::domain::foundation::{AuthenticatedUser, CorrelationToken, ValidationError};
use crate::ports::{
    AiProvider, CompletionRequest, ExtractionError, ResultPresenter, ShapeValidator,
    TextExtractor, TriggerRequest, WorkflowTrigger,
};

use super::payload::decode_response;

/// Command to start a dual-source analysis.
#[derive(Debug, Clone)]
pub struct RunAnalysisCommand {
    /// Which analysis to run; must be a dual-source kind.
    pub kind: AnalysisKind,
    /// The user's business description.
    pub business_description: String,
    /// Optional document attachment.
    pub attachment: Option<AttachedFile>,
}

/// Acknowledgement returned once both producers are launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStarted {
    /// Correlation token for the new session.
    pub token: CorrelationToken,
}

/// Setup-time failures; nothing was launched when one of these is returned.
#[derive(Debug, Error)]
pub enum RunAnalysisError {
    /// Required input missing or empty.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The attachment could not be converted to text.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The kind does not use the workflow producer.
    #[error("analysis kind '{kind}' does not use the workflow producer")]
    UnsupportedKind {
        /// The offending kind.
        kind: AnalysisKind,
    },
}

/// Handler for the dual-producer analysis kinds.
pub struct RunAnalysisHandler {
    coordinator: Arc<AnalysisCoordinator>,
    ai: Arc<dyn AiProvider>,
    workflow: Arc<dyn WorkflowTrigger>,
    extractor: Arc<dyn TextExtractor>,
    shapes: Arc<dyn ShapeValidator>,
    presenter: Arc<dyn ResultPresenter>,
}

impl RunAnalysisHandler {
    /// Creates a handler over the given collaborators.
    pub fn new(
        coordinator: Arc<AnalysisCoordinator>,
        ai: Arc<dyn AiProvider>,
        workflow: Arc<dyn WorkflowTrigger>,
        extractor: Arc<dyn TextExtractor>,
        shapes: Arc<dyn ShapeValidator>,
        presenter: Arc<dyn ResultPresenter>,
    ) -> Self {
        Self {
            coordinator,
            ai,
            workflow,
            extractor,
            shapes,
            presenter,
        }
    }

    /// Runs the Gathering phase and launches both producers.
    ///
    /// The authenticated user must already be established; requests
    /// without one never reach this handler.
    pub async fn handle(
        &self,
        command: RunAnalysisCommand,
        user: &AuthenticatedUser,
    ) -> Result<AnalysisStarted, RunAnalysisError> {
        let kind = command.kind;
        if !kind.is_dual_source() {
            return Err(RunAnalysisError::UnsupportedKind { kind });
        }

        let snapshot = match self.gather(&command) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.presenter.present_error(kind, err.to_string()).await;
                return Err(err);
            }
        };

        let token = self.coordinator.begin(snapshot.clone());
        info!(
            %token,
            kind = %kind,
            user = %user.id,
            "analysis session started"
        );

        self.launch_primary(token, snapshot);
        self.launch_trigger(token, &command);

        Ok(AnalysisStarted { token })
    }

    /// Validates inputs and builds the context snapshot.
    fn gather(&self, command: &RunAnalysisCommand) -> Result<ContextSnapshot, RunAnalysisError> {
        if command.business_description.trim().is_empty() {
            return Err(ValidationError::empty_field("business_description").into());
        }
        if command.kind.requires_attachment() && command.attachment.is_none() {
            return Err(ValidationError::missing_field("attachment").into());
        }

        let document_text = command
            .attachment
            .as_ref()
            .map(|file| self.extractor.extract(file))
            .transpose()?;

        Ok(ContextSnapshot::new(
            command.kind,
            command.business_description.trim(),
            document_text,
        ))
    }

    /// Launches the direct LLM producer as an independent task.
    fn launch_primary(&self, token: CorrelationToken, snapshot: ContextSnapshot) {
        let ai = self.ai.clone();
        let shapes = self.shapes.clone();
        let coordinator = self.coordinator.clone();

        tokio::spawn(async move {
            let result = run_completion(ai.as_ref(), shapes.as_ref(), &snapshot).await;
            let outcome = coordinator.record_primary(token, result).await;
            debug!(%token, ?outcome, "primary producer finished");
        });
    }

    /// Launches the workflow trigger as an independent task.
    ///
    /// A rejected trigger means no callback will ever arrive, so the
    /// secondary slot is filled with the neutral placeholder and the merge
    /// check still runs.
    fn launch_trigger(&self, token: CorrelationToken, command: &RunAnalysisCommand) {
        let workflow = self.workflow.clone();
        let coordinator = self.coordinator.clone();

        let mut request = TriggerRequest::new(token)
            .with_field("analysis_kind", command.kind.as_str())
            .with_field(
                "business_description",
                command.business_description.trim(),
            );
        if let Some(attachment) = &command.attachment {
            request = request.with_attachment(attachment.clone());
        }

        tokio::spawn(async move {
            match workflow.trigger(request).await {
                Ok(ack) => {
                    debug!(token = %ack.token, "workflow trigger accepted");
                }
                Err(err) => {
                    warn!(%token, error = %err, "workflow trigger rejected");
                    let outcome = coordinator
                        .record_secondary(token, SectionResult::empty())
                        .await;
                    debug!(%token, ?outcome, "secondary slot filled with placeholder");
                }
            }
        });
    }
}

/// Runs one completion for the snapshot and converts every failure into a
/// section placeholder. Never errors: the merge must always proceed.
pub(super) async fn run_completion(
    ai: &dyn AiProvider,
    shapes: &dyn ShapeValidator,
    snapshot: &ContextSnapshot,
) -> SectionResult {
    let request = CompletionRequest::new(snapshot.kind.build_prompt(snapshot))
        .with_structured_output();

    let response = match ai.complete(request).await {
        Ok(response) => response,
        Err(err) => {
            warn!(kind = %snapshot.kind, error = %err, "completion call failed");
            return SectionResult::failed(format!("analysis failed: {}", err));
        }
    };

    match decode_response(snapshot.kind, &response.content, shapes) {
        Ok(payload) => {
            SectionResult::ready(ParetoAnalyzer::annotate_payload(snapshot.kind, payload))
        }
        Err(err) => {
            warn!(
                kind = %snapshot.kind,
                error = %err,
                raw = %err.raw_text(),
                "completion payload rejected"
            );
            SectionResult::failed(format!("analysis failed: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiProvider;
    use crate::adapters::extraction::PlainTextExtractor;
    use crate::adapters::presentation::MemoryPresenter;
    use crate::adapters::validation::DeclarativeShapeValidator;
    use crate::adapters::workflow::MockWorkflowTrigger;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    struct Fixture {
        presenter: Arc<MemoryPresenter>,
        coordinator: Arc<AnalysisCoordinator>,
        workflow: Arc<MockWorkflowTrigger>,
        handler: RunAnalysisHandler,
    }

    fn fixture(ai: MockAiProvider, workflow: MockWorkflowTrigger) -> Fixture {
        let presenter = Arc::new(MemoryPresenter::new());
        let coordinator = Arc::new(AnalysisCoordinator::new(presenter.clone()));
        let workflow = Arc::new(workflow);
        let handler = RunAnalysisHandler::new(
            coordinator.clone(),
            Arc::new(ai),
            workflow.clone(),
            Arc::new(PlainTextExtractor::new()),
            Arc::new(DeclarativeShapeValidator::new()),
            presenter.clone(),
        );
        Fixture {
            presenter,
            coordinator,
            workflow,
            handler,
        }
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-1").unwrap(), "u@example.com", None)
    }

    fn objectives_command() -> RunAnalysisCommand {
        RunAnalysisCommand {
            kind: AnalysisKind::Objectives,
            business_description: "A logistics startup".to_string(),
            attachment: None,
        }
    }

    fn objectives_body() -> String {
        json!({
            "objectives": [
                {"description": "expand fleet", "horizon": "1y", "impact_score": 10},
                {"description": "automate dispatch", "horizon": "2y", "impact_score": 5},
                {"description": "open second depot", "horizon": "3y", "impact_score": 5}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn empty_description_aborts_before_launch() {
        let f = fixture(MockAiProvider::new(), MockWorkflowTrigger::accepting());
        let command = RunAnalysisCommand {
            business_description: "   ".to_string(),
            ..objectives_command()
        };

        let result = f.handler.handle(command, &user()).await;
        assert!(matches!(result, Err(RunAnalysisError::Validation(_))));
        assert!(f.coordinator.current_token().is_none());
        assert_eq!(f.presenter.errors().len(), 1);
        assert_eq!(f.workflow.calls(), 0);
    }

    #[tokio::test]
    async fn missing_attachment_aborts_for_document_kinds() {
        let f = fixture(MockAiProvider::new(), MockWorkflowTrigger::accepting());
        let command = RunAnalysisCommand {
            kind: AnalysisKind::MissionVision,
            business_description: "A bakery".to_string(),
            attachment: None,
        };

        let result = f.handler.handle(command, &user()).await;
        assert!(matches!(result, Err(RunAnalysisError::Validation(_))));
        assert_eq!(f.workflow.calls(), 0);
    }

    #[tokio::test]
    async fn direct_only_kind_is_rejected() {
        let f = fixture(MockAiProvider::new(), MockWorkflowTrigger::accepting());
        let command = RunAnalysisCommand {
            kind: AnalysisKind::Swot,
            ..objectives_command()
        };

        let result = f.handler.handle(command, &user()).await;
        assert!(matches!(
            result,
            Err(RunAnalysisError::UnsupportedKind { .. })
        ));
    }

    #[tokio::test]
    async fn successful_primary_and_notification_merge() {
        let ai = MockAiProvider::new().with_response(objectives_body());
        let f = fixture(ai, MockWorkflowTrigger::accepting());

        let started = f.handler.handle(objectives_command(), &user()).await.unwrap();

        // Simulate the out-of-band workflow result arriving; the merge
        // fires whenever the second slot fills, in either order.
        f.coordinator
            .record_secondary(
                started.token,
                SectionResult::ready(json!({"insights": [], "summary": "ok"})),
            )
            .await;

        let reports = f.presenter.wait_for_report().await;
        assert_eq!(reports.len(), 1);
        let primary = reports[0].primary.payload().unwrap();
        assert_eq!(primary["objectives"][0]["rank"], 1);
        assert_eq!(primary["objectives"][0]["priority"], "High");
        assert_eq!(primary["objectives"][2]["priority"], "Low");
        assert_eq!(primary["objectives"][2]["cumulative_percentage"], 100.0);
    }

    #[tokio::test]
    async fn rejected_trigger_fills_secondary_placeholder() {
        let ai = MockAiProvider::new().with_response(objectives_body());
        let f = fixture(ai, MockWorkflowTrigger::rejecting(503));

        f.handler.handle(objectives_command(), &user()).await.unwrap();

        let reports = f.presenter.wait_for_report().await;
        assert_eq!(reports.len(), 1);
        assert!(reports[0].primary.is_ready());
        assert_eq!(reports[0].secondary, SectionResult::empty());
    }

    #[tokio::test]
    async fn failed_completion_becomes_placeholder_and_merges() {
        let ai = MockAiProvider::new().with_error_status(500, "upstream exploded");
        let f = fixture(ai, MockWorkflowTrigger::rejecting(503));

        f.handler.handle(objectives_command(), &user()).await.unwrap();

        let reports = f.presenter.wait_for_report().await;
        assert_eq!(reports.len(), 1);
        assert!(matches!(reports[0].primary, SectionResult::Failed { .. }));
        assert_eq!(reports[0].secondary, SectionResult::empty());
    }

    #[tokio::test]
    async fn malformed_completion_becomes_placeholder() {
        let ai = MockAiProvider::new().with_response("no json here");
        let f = fixture(ai, MockWorkflowTrigger::rejecting(500));

        f.handler.handle(objectives_command(), &user()).await.unwrap();

        let reports = f.presenter.wait_for_report().await;
        assert!(matches!(reports[0].primary, SectionResult::Failed { .. }));
    }
}
