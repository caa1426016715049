//! Route definitions for the result stream.

use axum::routing::get;
use axum::Router;

use super::handlers::{results_ws, ResultsAppState};

/// Create the results router.
///
/// # Endpoints
///
/// - `GET /api/results/ws` - WebSocket stream of presented results
pub fn routes() -> Router<ResultsAppState> {
    Router::new().route("/api/results/ws", get(results_ws))
}
