//! Application layer - orchestration between domain logic and ports.
//!
//! - `coordinator` - The dual-source session state machine that merges the
//!   two producers' results exactly once
//! - `handlers` - Analysis launchers and the out-of-band notification
//!   handler

pub mod coordinator;
pub mod handlers;

pub use coordinator::{AnalysisCoordinator, MergeOutcome, SessionPhase};
pub use handlers::{
    DirectAnalysisCommand, DirectAnalysisError, DirectAnalysisHandler, PayloadError,
    RunAnalysisCommand, RunAnalysisError, RunAnalysisHandler, WorkflowNotificationHandler,
};
