//! Route definitions for the workflow callback.

use axum::routing::post;
use axum::Router;

use super::handlers::{workflow_callback, WebhookAppState};

/// Create the webhook router.
///
/// # Endpoints
///
/// - `POST /api/webhooks/workflow` - Signed workflow result callback
pub fn routes() -> Router<WebhookAppState> {
    Router::new().route("/api/webhooks/workflow", post(workflow_callback))
}
