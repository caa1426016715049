//! Route definitions for analysis endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{start_analysis, AnalysisAppState};

/// Create the analysis router.
///
/// # Endpoints
///
/// - `POST /api/analyses` - Start an analysis
pub fn routes() -> Router<AnalysisAppState> {
    Router::new().route("/api/analyses", post(start_analysis))
}
