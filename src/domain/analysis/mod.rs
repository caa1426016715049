//! Analysis domain - business factor prioritization and composite reports.
//!
//! # Module Organization
//!
//! - `attachment` - Uploaded document attachments
//! - `factor` - Scored business factors and priority annotations
//! - `pareto` - Pure 80/20 prioritization over scored factors
//! - `kind` - Analysis kind descriptors (inputs, shapes, producers)
//! - `context` - The input bundle shared by both producers
//! - `report` - Section results, placeholders, and the composite report
//! - `events` - Domain events for out-of-band workflow results

mod attachment;
mod context;
mod events;
mod factor;
mod kind;
mod pareto;
mod report;

pub use attachment::AttachedFile;
pub use context::ContextSnapshot;
pub use events::{WorkflowResultReceived, WORKFLOW_RESULT_RECEIVED};
pub use factor::{Priority, PrioritizedFactor, ScoredFactor};
pub use kind::AnalysisKind;
pub use pareto::ParetoAnalyzer;
pub use report::{AnalysisReport, SectionResult};
