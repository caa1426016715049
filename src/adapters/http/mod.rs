//! HTTP surface - axum routes, handlers, DTOs, and middleware.
//!
//! # Endpoints
//!
//! - `POST /api/analyses` - Start an analysis (multipart; bearer auth)
//! - `POST /api/webhooks/workflow` - Signed workflow result callback
//! - `GET /api/results/ws` - WebSocket stream of presented results

pub mod analysis;
pub mod middleware;
pub mod results;
pub mod webhook;
