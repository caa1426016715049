//! Result stream endpoint.

mod handlers;
mod routes;

pub use handlers::ResultsAppState;
pub use routes::routes;
