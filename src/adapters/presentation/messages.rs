//! Outbound messages pushed to connected clients.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{AnalysisKind, AnalysisReport};

/// One update pushed to result subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultUpdate {
    /// A fully-merged analysis report.
    Report {
        /// The report.
        report: AnalysisReport,
    },
    /// An inline setup error for the named analysis kind.
    Error {
        /// The analysis that failed to start.
        kind: AnalysisKind,
        /// Human-readable message for the result area.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{ContextSnapshot, SectionResult};
    use crate::domain::foundation::CorrelationToken;
    use serde_json::json;

    #[test]
    fn updates_tag_by_type() {
        let report = AnalysisReport::new(
            CorrelationToken::new(),
            ContextSnapshot::new(AnalysisKind::Swot, "desc", None),
            SectionResult::ready(json!({})),
            SectionResult::empty(),
        );
        let value = serde_json::to_value(ResultUpdate::Report { report }).unwrap();
        assert_eq!(value["type"], "report");

        let value = serde_json::to_value(ResultUpdate::Error {
            kind: AnalysisKind::Swot,
            message: "missing input".to_string(),
        })
        .unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["kind"], "swot");
    }
}
