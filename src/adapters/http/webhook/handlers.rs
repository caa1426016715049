//! HTTP handler for the workflow result callback.
//!
//! The workflow engine posts its analytical result here once finished,
//! signed with the shared webhook secret. A verified callback becomes a
//! `workflow.result.received` event on the bus; whether the token still
//! matches a live session is decided downstream, so this endpoint answers
//! 202 even for results that will be discarded as stale.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};

use crate::domain::analysis::WorkflowResultReceived;
use crate::domain::workflow::{WebhookError, WorkflowWebhookVerifier};
use crate::ports::EventPublisher;

/// Header carrying the callback signature.
pub const SIGNATURE_HEADER: &str = "x-workflow-signature";

/// Shared state for the webhook endpoint.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<WorkflowWebhookVerifier>,
    pub publisher: Arc<dyn EventPublisher>,
}

impl WebhookAppState {
    pub fn new(verifier: Arc<WorkflowWebhookVerifier>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            verifier,
            publisher,
        }
    }
}

/// Accept a signed workflow result callback.
///
/// POST /api/webhooks/workflow
pub async fn workflow_callback(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "missing signature header",
                "code": "SIGNATURE_MISSING"
            })),
        )
            .into_response();
    };

    let callback = match state.verifier.verify_and_parse(&body, signature) {
        Ok(callback) => callback,
        Err(err) => return verification_error_response(err),
    };

    debug!(token = %callback.token, "workflow callback verified");

    let event = WorkflowResultReceived::new(callback.token, callback.result).to_envelope();
    if let Err(err) = state.publisher.publish(event).await {
        warn!(error = %err, "failed to publish workflow result event");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "event delivery failed",
                "code": "EVENT_BUS_ERROR"
            })),
        )
            .into_response();
    }

    StatusCode::ACCEPTED.into_response()
}

fn verification_error_response(err: WebhookError) -> Response {
    let (status, code) = match &err {
        WebhookError::InvalidSignature => (StatusCode::UNAUTHORIZED, "SIGNATURE_INVALID"),
        WebhookError::TimestampOutOfRange { .. } | WebhookError::InvalidTimestamp => {
            (StatusCode::UNAUTHORIZED, "TIMESTAMP_REJECTED")
        }
        WebhookError::ParseError(_) => (StatusCode::BAD_REQUEST, "MALFORMED_CALLBACK"),
    };
    (
        status,
        Json(serde_json::json!({
            "error": err.to_string(),
            "code": code
        })),
    )
        .into_response()
}
