//! End-to-end analysis flow tests against mock adapters.
//!
//! Exercises the dual-producer race through the real coordinator, event
//! bus, and notification handler: every completion order, per-producer
//! failure fallback, stale-token discard, and session supersession.

use std::sync::Arc;

use serde_json::json;

use bizsight::adapters::ai::MockAiProvider;
use bizsight::adapters::events::InMemoryEventBus;
use bizsight::adapters::extraction::PlainTextExtractor;
use bizsight::adapters::presentation::MemoryPresenter;
use bizsight::adapters::validation::DeclarativeShapeValidator;
use bizsight::adapters::workflow::MockWorkflowTrigger;
use bizsight::application::coordinator::AnalysisCoordinator;
use bizsight::application::handlers::{
    RunAnalysisCommand, RunAnalysisHandler, WorkflowNotificationHandler,
};
use bizsight::domain::analysis::{AnalysisKind, AttachedFile, SectionResult, WorkflowResultReceived};
use bizsight::domain::foundation::{AuthenticatedUser, CorrelationToken, UserId};
use bizsight::ports::EventPublisher;

struct Harness {
    presenter: Arc<MemoryPresenter>,
    coordinator: Arc<AnalysisCoordinator>,
    bus: Arc<InMemoryEventBus>,
    workflow: Arc<MockWorkflowTrigger>,
    handler: RunAnalysisHandler,
}

fn harness(ai: MockAiProvider, workflow: MockWorkflowTrigger) -> Harness {
    let presenter = Arc::new(MemoryPresenter::new());
    let coordinator = Arc::new(AnalysisCoordinator::new(presenter.clone()));
    let shapes = Arc::new(DeclarativeShapeValidator::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let workflow = Arc::new(workflow);

    let notification_handler =
        WorkflowNotificationHandler::new_shared(coordinator.clone(), shapes.clone());
    notification_handler.register(bus.as_ref());

    let handler = RunAnalysisHandler::new(
        coordinator.clone(),
        Arc::new(ai),
        workflow.clone(),
        Arc::new(PlainTextExtractor::new()),
        shapes,
        presenter.clone(),
    );

    Harness {
        presenter,
        coordinator,
        bus,
        workflow,
        handler,
    }
}

fn user() -> AuthenticatedUser {
    AuthenticatedUser::new(UserId::new("user-7").unwrap(), "analyst@example.com", None)
}

fn mission_vision_command() -> RunAnalysisCommand {
    RunAnalysisCommand {
        kind: AnalysisKind::MissionVision,
        business_description: "A regional bakery chain".to_string(),
        attachment: Some(AttachedFile::new(
            "strategy.md",
            "text/markdown",
            b"# Mission\nFresh bread for everyone.".to_vec(),
        )),
    }
}

fn mission_vision_completion() -> String {
    json!({
        "mission": {"statement": "Fresh bread for everyone", "assessment": "clear"},
        "vision": {"statement": "Every town, one bakery", "assessment": "ambitious"},
        "alignment_gaps": ["no sustainability goal"]
    })
    .to_string()
}

fn workflow_result() -> serde_json::Value {
    json!({
        "insights": [{"description": "competitor density is low"}],
        "summary": "expansion viable"
    })
}

async fn deliver_callback(bus: &InMemoryEventBus, token: CorrelationToken) {
    bus.publish(WorkflowResultReceived::new(token, workflow_result()).to_envelope())
        .await
        .unwrap();
}

#[tokio::test]
async fn both_producers_succeed_and_merge_once() {
    let h = harness(
        MockAiProvider::new().with_response(mission_vision_completion()),
        MockWorkflowTrigger::accepting(),
    );

    let started = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    deliver_callback(&h.bus, started.token).await;

    let reports = h.presenter.wait_for_report().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].token, started.token);
    assert!(reports[0].primary.is_ready());
    assert!(reports[0].secondary.is_ready());
    assert_eq!(h.workflow.calls(), 1);
}

#[tokio::test]
async fn notification_before_primary_completion_merges_identically() {
    // A slow model: the out-of-band callback lands first.
    let ai = MockAiProvider::new()
        .with_response(mission_vision_completion())
        .with_delay(std::time::Duration::from_millis(100));
    let h = harness(ai, MockWorkflowTrigger::accepting());

    let started = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    deliver_callback(&h.bus, started.token).await;
    assert!(h.presenter.reports().is_empty());

    let reports = h.presenter.wait_for_report().await;
    assert_eq!(reports.len(), 1);
    assert!(reports[0].primary.is_ready());
    assert!(reports[0].secondary.is_ready());
}

#[tokio::test]
async fn failed_primary_still_merges_with_workflow_result() {
    let h = harness(
        MockAiProvider::new().with_error_status(500, "model down"),
        MockWorkflowTrigger::accepting(),
    );

    let started = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();
    deliver_callback(&h.bus, started.token).await;

    let reports = h.presenter.wait_for_report().await;
    assert!(matches!(reports[0].primary, SectionResult::Failed { .. }));
    assert!(reports[0].secondary.is_ready());
}

#[tokio::test]
async fn rejected_trigger_merges_with_empty_secondary() {
    let h = harness(
        MockAiProvider::new().with_response(mission_vision_completion()),
        MockWorkflowTrigger::rejecting(503),
    );

    h.handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    let reports = h.presenter.wait_for_report().await;
    assert!(reports[0].primary.is_ready());
    assert_eq!(reports[0].secondary, SectionResult::empty());
}

#[tokio::test]
async fn both_producers_failing_still_present_placeholders() {
    let h = harness(
        MockAiProvider::new().with_network_error("connection refused"),
        MockWorkflowTrigger::rejecting(500),
    );

    h.handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    let reports = h.presenter.wait_for_report().await;
    assert!(matches!(reports[0].primary, SectionResult::Failed { .. }));
    assert_eq!(reports[0].secondary, SectionResult::empty());
}

#[tokio::test]
async fn invalid_workflow_payload_degrades_to_failed_section() {
    let h = harness(
        MockAiProvider::new().with_response(mission_vision_completion()),
        MockWorkflowTrigger::accepting(),
    );

    let started = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    h.bus
        .publish(
            WorkflowResultReceived::new(started.token, json!({"wrong": "shape"})).to_envelope(),
        )
        .await
        .unwrap();

    let reports = h.presenter.wait_for_report().await;
    assert!(matches!(reports[0].secondary, SectionResult::Failed { .. }));
}

#[tokio::test]
async fn duplicate_callback_does_not_present_twice() {
    let h = harness(
        MockAiProvider::new().with_response(mission_vision_completion()),
        MockWorkflowTrigger::accepting(),
    );

    let started = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    deliver_callback(&h.bus, started.token).await;
    let reports = h.presenter.wait_for_report().await;
    assert_eq!(reports.len(), 1);

    deliver_callback(&h.bus, started.token).await;
    assert_eq!(h.presenter.reports().len(), 1);
}

#[tokio::test]
async fn callback_for_unknown_token_is_ignored() {
    let h = harness(
        MockAiProvider::new().with_response(mission_vision_completion()),
        MockWorkflowTrigger::accepting(),
    );

    let started = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();

    deliver_callback(&h.bus, CorrelationToken::new()).await;
    assert!(h.presenter.reports().is_empty());

    deliver_callback(&h.bus, started.token).await;
    assert_eq!(h.presenter.wait_for_report().await.len(), 1);
}

#[tokio::test]
async fn new_analysis_discards_superseded_results() {
    let ai = MockAiProvider::new()
        .with_response(mission_vision_completion())
        .with_response(mission_vision_completion());
    let h = harness(ai, MockWorkflowTrigger::accepting());

    let first = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();
    let second = h
        .handler
        .handle(mission_vision_command(), &user())
        .await
        .unwrap();
    assert_ne!(first.token, second.token);

    // The first session's late callback is dropped silently.
    deliver_callback(&h.bus, first.token).await;
    assert_eq!(h.coordinator.current_token(), Some(second.token));

    deliver_callback(&h.bus, second.token).await;
    let reports = h.presenter.wait_for_report().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].token, second.token);
}
