//! BizSight - Business analysis service.
//!
//! Combines a direct LLM completion with an asynchronous workflow analysis
//! over the same user input, validates the loosely-typed JSON both return,
//! applies 80/20 Pareto prioritization to scored business factors, and
//! pushes merged reports to connected clients.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
