//! BizSight server bootstrap.
//!
//! Loads configuration, wires adapters to ports, registers the workflow
//! notification handler on the event bus, and serves the HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bizsight::adapters::ai::{OpenAiConfig, OpenAiProvider};
use bizsight::adapters::auth::{JwtSessionValidator, JwtValidatorConfig};
use bizsight::adapters::events::InMemoryEventBus;
use bizsight::adapters::extraction::PlainTextExtractor;
use bizsight::adapters::http::middleware::{auth_middleware, AuthState};
use bizsight::adapters::http::{analysis, results, webhook};
use bizsight::adapters::presentation::BroadcastPresenter;
use bizsight::adapters::validation::DeclarativeShapeValidator;
use bizsight::adapters::workflow::{N8nTrigger, N8nTriggerConfig};
use bizsight::application::coordinator::AnalysisCoordinator;
use bizsight::application::handlers::{
    DirectAnalysisHandler, RunAnalysisHandler, WorkflowNotificationHandler,
};
use bizsight::config::AppConfig;
use bizsight::domain::workflow::WorkflowWebhookVerifier;
use bizsight::ports::{
    AiProvider, EventPublisher, ResultPresenter, SessionValidator, ShapeValidator, TextExtractor,
    WorkflowTrigger,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(config.server.environment.is_production());
    config.validate()?;

    // Adapters
    let presenter = Arc::new(BroadcastPresenter::with_default_capacity());
    let ai: Arc<dyn AiProvider> = Arc::new(OpenAiProvider::new(
        OpenAiConfig::new(config.ai.api_key.clone())
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    ));
    let workflow_trigger: Arc<dyn WorkflowTrigger> = Arc::new(N8nTrigger::new(
        N8nTriggerConfig::new(config.workflow.trigger_url.clone())
            .with_timeout(config.workflow.timeout()),
    ));
    let extractor: Arc<dyn TextExtractor> = Arc::new(PlainTextExtractor::new());
    let shapes: Arc<dyn ShapeValidator> = Arc::new(DeclarativeShapeValidator::new());
    let session_validator: Arc<dyn SessionValidator> =
        Arc::new(JwtSessionValidator::new(JwtValidatorConfig {
            secret: config.auth.jwt_secret.clone(),
            issuer: config.auth.issuer.clone(),
            audience: config.auth.audience.clone(),
        }));
    let event_bus = Arc::new(InMemoryEventBus::new());

    // Application wiring
    let presenter_port: Arc<dyn ResultPresenter> = presenter.clone();
    let coordinator = Arc::new(AnalysisCoordinator::new(presenter_port.clone()));

    let notification_handler =
        WorkflowNotificationHandler::new_shared(coordinator.clone(), shapes.clone());
    notification_handler.register(event_bus.as_ref());

    let run_handler = Arc::new(RunAnalysisHandler::new(
        coordinator.clone(),
        ai.clone(),
        workflow_trigger.clone(),
        extractor.clone(),
        shapes.clone(),
        presenter_port.clone(),
    ));
    let direct_handler = Arc::new(DirectAnalysisHandler::new(
        ai,
        extractor,
        shapes.clone(),
        presenter_port,
        config.ai.timeout(),
    ));

    // HTTP surface
    let analysis_state = analysis::AnalysisAppState::new(run_handler, direct_handler);
    let webhook_state = webhook::WebhookAppState::new(
        Arc::new(WorkflowWebhookVerifier::new(
            config.workflow.webhook_secret.clone(),
        )),
        event_bus.clone() as Arc<dyn EventPublisher>,
    );
    let results_state = results::ResultsAppState::new(presenter);

    let auth_state: AuthState = session_validator;
    let app = Router::new()
        .merge(
            analysis::routes()
                .with_state(analysis_state)
                .layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .merge(webhook::routes().with_state(webhook_state))
        .merge(results::routes().with_state(results_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        );

    let addr = config.server.socket_addr();
    info!(%addr, "bizsight listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
