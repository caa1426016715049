//! Section results and the merged composite report.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{CorrelationToken, Timestamp};

use super::{AnalysisKind, ContextSnapshot};

/// One producer's contribution to the composite report.
///
/// Failures carry the same shape as successes so the merge step never
/// needs a null check: a failed producer fills its slot with an explicit
/// placeholder and the merge proceeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionResult {
    /// Validated (and, where applicable, Pareto-annotated) payload.
    Ready { payload: JsonValue },
    /// The producer ran and failed; the message is shown in its section.
    Failed { message: String },
    /// Neutral placeholder for a producer that never got started
    /// (e.g., the workflow trigger itself was rejected).
    Empty,
}

impl SectionResult {
    /// Creates a ready section from a validated payload.
    pub fn ready(payload: JsonValue) -> Self {
        SectionResult::Ready { payload }
    }

    /// Creates a failed-analysis placeholder.
    pub fn failed(message: impl Into<String>) -> Self {
        SectionResult::Failed {
            message: message.into(),
        }
    }

    /// Creates the neutral placeholder.
    pub fn empty() -> Self {
        SectionResult::Empty
    }

    /// Returns true for a validated payload.
    pub fn is_ready(&self) -> bool {
        matches!(self, SectionResult::Ready { .. })
    }

    /// Returns the validated payload, if any.
    pub fn payload(&self) -> Option<&JsonValue> {
        match self {
            SectionResult::Ready { payload } => Some(payload),
            _ => None,
        }
    }
}

/// The merged composite handed to the presenter.
///
/// Only ever constructed from two filled section slots; the presenter
/// never sees a partially-populated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Correlation token of the session that produced this report.
    pub token: CorrelationToken,
    /// Which analysis operation ran.
    pub kind: AnalysisKind,
    /// The input bundle the producers analyzed.
    pub context: ContextSnapshot,
    /// Result of the direct LLM producer.
    pub primary: SectionResult,
    /// Result of the delayed workflow producer.
    pub secondary: SectionResult,
    /// When the merge completed.
    pub completed_at: Timestamp,
}

impl AnalysisReport {
    /// Creates a report from two filled sections.
    pub fn new(
        token: CorrelationToken,
        context: ContextSnapshot,
        primary: SectionResult,
        secondary: SectionResult,
    ) -> Self {
        Self {
            token,
            kind: context.kind,
            context,
            primary,
            secondary,
            completed_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_result_tags_by_status() {
        let ready = serde_json::to_value(SectionResult::ready(json!({"a": 1}))).unwrap();
        assert_eq!(ready["status"], "ready");
        assert_eq!(ready["payload"]["a"], 1);

        let failed = serde_json::to_value(SectionResult::failed("analysis failed")).unwrap();
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["message"], "analysis failed");

        let empty = serde_json::to_value(SectionResult::empty()).unwrap();
        assert_eq!(empty["status"], "empty");
    }

    #[test]
    fn failed_section_is_not_ready() {
        assert!(SectionResult::ready(json!({})).is_ready());
        assert!(!SectionResult::failed("x").is_ready());
        assert!(!SectionResult::empty().is_ready());
    }

    #[test]
    fn report_echoes_kind_from_context() {
        let context = ContextSnapshot::new(AnalysisKind::Objectives, "desc", None);
        let report = AnalysisReport::new(
            CorrelationToken::new(),
            context,
            SectionResult::ready(json!({"objectives": []})),
            SectionResult::empty(),
        );
        assert_eq!(report.kind, AnalysisKind::Objectives);
    }
}
