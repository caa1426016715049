//! Decoding of the JSON payload embedded in LLM completion text.
//!
//! Completion services return free-form text expected to contain a single
//! JSON object. Models occasionally wrap it in a markdown code fence, so
//! the fence is stripped before parsing. Parse and shape failures keep the
//! raw text for diagnostics.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::domain::analysis::AnalysisKind;
use crate::ports::{ShapeValidator, ShapeViolations};

/// Errors decoding an embedded analysis payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The completion text did not contain parseable JSON.
    #[error("embedded payload is not valid JSON: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
        /// The raw completion text, preserved for diagnostics.
        raw: String,
    },

    /// The JSON parsed but did not match the declared shape.
    #[error("{violations}")]
    Shape {
        /// Every violation found.
        violations: ShapeViolations,
        /// The raw completion text, preserved for diagnostics.
        raw: String,
    },
}

impl PayloadError {
    /// The raw completion text that failed to decode.
    pub fn raw_text(&self) -> &str {
        match self {
            PayloadError::Parse { raw, .. } => raw,
            PayloadError::Shape { raw, .. } => raw,
        }
    }
}

/// Parses the JSON embedded in completion text and validates its shape.
pub fn decode_response(
    kind: AnalysisKind,
    content: &str,
    shapes: &dyn ShapeValidator,
) -> Result<JsonValue, PayloadError> {
    let stripped = strip_code_fence(content);

    let payload: JsonValue = serde_json::from_str(stripped).map_err(|e| PayloadError::Parse {
        message: e.to_string(),
        raw: content.to_string(),
    })?;

    shapes
        .validate(kind, &payload)
        .map_err(|violations| PayloadError::Shape {
            violations,
            raw: content.to_string(),
        })?;

    Ok(payload)
}

/// Strips a surrounding markdown code fence (```json ... ``` or ``` ... ```).
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    match body.split_once('\n') {
        Some((first_line, remainder)) if !first_line.trim().contains(' ') => remainder.trim(),
        _ => body.trim(),
    }
}
