//! Shape Validator Port - Declarative response shape validation.
//!
//! Both producers return loosely-typed JSON; before anything downstream
//! touches a payload it is checked against the declared shape for its
//! analysis kind. Violations carry field paths so diagnostics can point
//! at the exact offending field.

use std::fmt;

use crate::domain::analysis::AnalysisKind;
use serde_json::Value as JsonValue;

/// Port for validating response payloads against per-kind shapes.
///
/// # Contract
///
/// Implementations must:
/// - Accept any payload that satisfies the declared shape for the kind
/// - Report every violation found, not just the first
/// - Never mutate the payload
pub trait ShapeValidator: Send + Sync {
    /// Validates a payload against the declared shape for the kind.
    fn validate(&self, kind: AnalysisKind, payload: &JsonValue) -> Result<(), ShapeViolations>;

    /// Validates an out-of-band workflow result against the workflow
    /// callback shape (shared by all kinds).
    fn validate_workflow_result(&self, payload: &JsonValue) -> Result<(), ShapeViolations>;
}

/// One field-level violation of a declared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeViolation {
    /// Path to the offending field (e.g., `strengths[2].impact_score`).
    pub path: String,
    /// What was wrong.
    pub problem: String,
}

impl ShapeViolation {
    /// Creates a violation at the given path.
    pub fn new(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

/// All violations found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("response shape invalid: {}", self.summary())]
pub struct ShapeViolations {
    /// Every violation found.
    pub violations: Vec<ShapeViolation>,
}

impl ShapeViolations {
    /// Creates a violation set.
    pub fn new(violations: Vec<ShapeViolation>) -> Self {
        Self { violations }
    }

    /// A single violation.
    pub fn single(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            violations: vec![ShapeViolation::new(path, problem)],
        }
    }

    /// Semicolon-joined summary of all violations.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ShapeViolation::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}
