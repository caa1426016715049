//! HTTP DTOs for analysis endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution.

use serde::Serialize;

use crate::domain::analysis::{AnalysisKind, AnalysisReport};
use crate::domain::foundation::CorrelationToken;

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a dual-source analysis accepted for processing.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStartedResponse {
    pub token: CorrelationToken,
    pub kind: AnalysisKind,
    pub status: String,
}

impl AnalysisStartedResponse {
    /// Builds the acceptance response.
    pub fn processing(token: CorrelationToken, kind: AnalysisKind) -> Self {
        Self {
            token,
            kind,
            status: "processing".to_string(),
        }
    }
}

/// Response for a direct-only analysis that completed in-request.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub report: AnalysisReport,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            code: "UNPROCESSABLE".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
