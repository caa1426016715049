//! Analysis endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{AnalysisStartedResponse, ErrorResponse, ReportResponse};
pub use handlers::AnalysisAppState;
pub use routes::routes;
