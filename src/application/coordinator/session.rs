//! The per-analysis session object.

use crate::domain::analysis::{ContextSnapshot, SectionResult};
use crate::domain::foundation::{CorrelationToken, Timestamp};

/// Which producer a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerSlot {
    /// The direct LLM call.
    Primary,
    /// The delayed workflow producer.
    Secondary,
}

/// Outcome of recording one producer completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Result stored; the other slot is still empty.
    Recorded,
    /// Both slots filled; the merge ran and the report was presented.
    Merged,
    /// The slot was already filled, or the session already merged.
    Duplicate,
    /// No live session, or the token belongs to a superseded session.
    Stale,
}

/// State for one in-flight dual-source analysis.
///
/// At most one session is live at a time; a new analysis supersedes the
/// previous one and its late results are discarded by token mismatch.
#[derive(Debug)]
pub struct AnalysisSession {
    /// Correlation token identifying this session.
    pub token: CorrelationToken,
    /// The exact input bundle sent to both producers, retained so a late
    /// notification can be merged without re-gathering user input.
    pub snapshot: ContextSnapshot,
    /// Result slot for the direct LLM call.
    pub primary: Option<SectionResult>,
    /// Result slot for the delayed workflow producer.
    pub secondary: Option<SectionResult>,
    /// Set inside the critical section the moment both slots are full;
    /// guards against a second completion re-running the merge.
    pub merged: bool,
    /// When this session was created.
    pub started_at: Timestamp,
}

impl AnalysisSession {
    /// Creates a fresh session with empty slots.
    pub fn new(token: CorrelationToken, snapshot: ContextSnapshot) -> Self {
        Self {
            token,
            snapshot,
            primary: None,
            secondary: None,
            merged: false,
            started_at: Timestamp::now(),
        }
    }

    /// Fills a slot. Returns false if the slot was already filled.
    pub fn record(&mut self, slot: ProducerSlot, result: SectionResult) -> bool {
        let target = match slot {
            ProducerSlot::Primary => &mut self.primary,
            ProducerSlot::Secondary => &mut self.secondary,
        };
        if target.is_some() {
            return false;
        }
        *target = Some(result);
        true
    }

    /// True once both slots are filled.
    pub fn is_complete(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::AnalysisKind;
    use serde_json::json;

    fn session() -> AnalysisSession {
        AnalysisSession::new(
            CorrelationToken::new(),
            ContextSnapshot::new(AnalysisKind::Objectives, "desc", None),
        )
    }

    #[test]
    fn fresh_session_is_incomplete() {
        let session = session();
        assert!(!session.is_complete());
        assert!(!session.merged);
    }

    #[test]
    fn both_slots_make_session_complete() {
        let mut session = session();
        assert!(session.record(ProducerSlot::Primary, SectionResult::ready(json!({}))));
        assert!(!session.is_complete());
        assert!(session.record(ProducerSlot::Secondary, SectionResult::empty()));
        assert!(session.is_complete());
    }

    #[test]
    fn refilling_a_slot_is_rejected() {
        let mut session = session();
        assert!(session.record(ProducerSlot::Primary, SectionResult::ready(json!({"a": 1}))));
        assert!(!session.record(ProducerSlot::Primary, SectionResult::ready(json!({"a": 2}))));
        assert_eq!(
            session.primary,
            Some(SectionResult::ready(json!({"a": 1})))
        );
    }
}
