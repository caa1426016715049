//! Dual-source result coordination.
//!
//! An analysis that uses both producers launches a direct LLM call and a
//! fire-and-forget workflow trigger from the same gathered input. The two
//! complete in either order; whichever finishes last performs the single
//! merge. This module owns the session state for that race and enforces
//! the merge-exactly-once and stale-discard rules.

mod dual_source;
mod session;

pub use dual_source::{AnalysisCoordinator, SessionPhase};
pub use session::{AnalysisSession, MergeOutcome, ProducerSlot};
