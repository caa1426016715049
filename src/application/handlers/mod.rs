//! Application handlers for the analysis operations.
//!
//! - `run_analysis` - Launches the dual-producer analysis kinds
//! - `direct_analysis` - The generic single-producer template
//! - `workflow_notification` - Records out-of-band workflow results
//! - `payload` - Embedded-JSON decoding shared by both paths

mod direct_analysis;
mod payload;
mod run_analysis;
mod workflow_notification;

pub use direct_analysis::{DirectAnalysisCommand, DirectAnalysisError, DirectAnalysisHandler};
pub use payload::{decode_response, PayloadError};
pub use run_analysis::{AnalysisStarted, RunAnalysisCommand, RunAnalysisError, RunAnalysisHandler};
pub use workflow_notification::WorkflowNotificationHandler;
