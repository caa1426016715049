//! Analysis kind descriptors.
//!
//! Every analysis operation is one parameterization of two shared
//! templates: the direct request/response path, and the dual-producer path
//! that additionally triggers an asynchronous workflow. A kind declares its
//! required inputs, which response fields carry scored factors, and whether
//! the workflow producer participates.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

use super::ContextSnapshot;

/// The analysis operations offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Strengths / weaknesses / opportunities / threats extraction.
    Swot,
    /// Key performance indicator extraction.
    KeyIndicators,
    /// Mission and vision statement review (document-driven).
    MissionVision,
    /// Strategic objective extraction.
    Objectives,
}

impl AnalysisKind {
    /// All kinds, in presentation order.
    pub fn all() -> &'static [AnalysisKind] {
        &[
            AnalysisKind::Swot,
            AnalysisKind::KeyIndicators,
            AnalysisKind::MissionVision,
            AnalysisKind::Objectives,
        ]
    }

    /// Stable machine-readable name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Swot => "swot",
            AnalysisKind::KeyIndicators => "key_indicators",
            AnalysisKind::MissionVision => "mission_vision",
            AnalysisKind::Objectives => "objectives",
        }
    }

    /// Human-readable name for presentation.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisKind::Swot => "SWOT Analysis",
            AnalysisKind::KeyIndicators => "Key Performance Indicators",
            AnalysisKind::MissionVision => "Mission & Vision Review",
            AnalysisKind::Objectives => "Strategic Objectives",
        }
    }

    /// True when the kind runs both producers (direct LLM call plus the
    /// asynchronous workflow whose result arrives out-of-band).
    pub fn is_dual_source(&self) -> bool {
        matches!(self, AnalysisKind::MissionVision | AnalysisKind::Objectives)
    }

    /// True when the kind cannot run without a document attachment.
    pub fn requires_attachment(&self) -> bool {
        matches!(self, AnalysisKind::MissionVision)
    }

    /// Response fields holding arrays of scored factors, to be annotated
    /// by the Pareto prioritizer after shape validation.
    pub fn scored_factor_paths(&self) -> &'static [&'static str] {
        match self {
            AnalysisKind::Swot => &["strengths", "weaknesses", "opportunities", "threats"],
            AnalysisKind::KeyIndicators => &["indicators"],
            AnalysisKind::MissionVision => &[],
            AnalysisKind::Objectives => &["objectives"],
        }
    }

    /// Assembles the completion prompt for this kind from the gathered
    /// input bundle.
    ///
    /// Prompt text is deliberately plain: the analytical weight lives in
    /// the response contract, which instructs the model to answer with a
    /// single JSON object matching the kind's validated shape.
    pub fn build_prompt(&self, context: &ContextSnapshot) -> String {
        let mut prompt = String::new();
        prompt.push_str(self.prompt_instructions());
        prompt.push_str("\n\nBusiness description:\n");
        prompt.push_str(&context.business_description);
        if let Some(document) = &context.document_text {
            prompt.push_str("\n\nSupporting document:\n");
            prompt.push_str(document);
        }
        prompt.push_str("\n\nRespond with a single JSON object only, no surrounding prose.");
        prompt
    }

    fn prompt_instructions(&self) -> &'static str {
        match self {
            AnalysisKind::Swot => {
                "You are a business analyst. Extract the strengths, weaknesses, \
                 opportunities, and threats for the business described below. Return a \
                 JSON object with arrays \"strengths\", \"weaknesses\", \"opportunities\", \
                 and \"threats\"; each item must have \"description\" (string) and \
                 \"impact_score\" (number from 1 to 10)."
            }
            AnalysisKind::KeyIndicators => {
                "You are a business analyst. Identify the key performance indicators the \
                 business described below should track. Return a JSON object with an array \
                 \"indicators\"; each item must have \"description\" (string), \
                 \"measurement\" (string), and \"impact_score\" (number from 1 to 10)."
            }
            AnalysisKind::MissionVision => {
                "You are a business analyst. Review the mission and vision of the business \
                 described below against the supporting document. Return a JSON object with \
                 objects \"mission\" and \"vision\", each containing \"statement\" (string) \
                 and \"assessment\" (string), plus an array \"alignment_gaps\" of strings."
            }
            AnalysisKind::Objectives => {
                "You are a business analyst. Derive the strategic objectives for the \
                 business described below. Return a JSON object with an array \
                 \"objectives\"; each item must have \"description\" (string), \
                 \"horizon\" (string), and \"impact_score\" (number from 1 to 10)."
            }
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("kind", format!("unknown kind '{}'", s)))
    }
}
