//! Workflow callback endpoint.

mod handlers;
mod routes;

pub use handlers::WebhookAppState;
pub use routes::routes;
