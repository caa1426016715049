//! The gathered input bundle shared by both analysis producers.

use serde::{Deserialize, Serialize};

use super::AnalysisKind;

/// The exact input sent to both producers, retained on the session so a
/// late-arriving workflow result can be merged and presented without
/// re-gathering user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Which analysis operation this input feeds.
    pub kind: AnalysisKind,

    /// The user's business description text.
    pub business_description: String,

    /// Extracted plain text of the attached document, when one was provided.
    pub document_text: Option<String>,
}

impl ContextSnapshot {
    /// Creates a snapshot of the gathered input.
    pub fn new(
        kind: AnalysisKind,
        business_description: impl Into<String>,
        document_text: Option<String>,
    ) -> Self {
        Self {
            kind,
            business_description: business_description.into(),
            document_text,
        }
    }
}
